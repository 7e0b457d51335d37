//! Command handler for pager scripts

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use tracing::debug;
use verticalpager::memory::{
    HostLog, IndicatorLog, MemoryHost, MemoryIndicator, MemoryProxy, MemorySurface, SurfaceLog,
};
use verticalpager::{
    checked_index, checked_insert_index, Error, PageRef, PagerConfig, PagerController,
    PagerEvent, ProxyId, Result, ScrollOutcome, TransitionId,
};

use crate::script::{Arg, Command};

pub struct SessionHandler {
    pager: PagerController<MemoryHost>,
    host: Arc<Mutex<HostLog>>,
    surface: Arc<Mutex<SurfaceLog>>,
    indicator: Arc<Mutex<IndicatorLog>>,
    events: Arc<Mutex<Vec<PagerEvent>>>,
    pending: Option<TransitionId>,
    next_id: u64,
}

impl SessionHandler {
    pub fn new(config: &PagerConfig) -> Result<Self> {
        let host = MemoryHost::new();
        let surface = MemorySurface::new();
        let indicator = MemoryIndicator::new();
        let (host_log, surface_log, indicator_log) = (host.log(), surface.log(), indicator.log());

        let mut pager = PagerController::new(host, surface, config)?.with_indicator(indicator);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        pager.on_event(move |event| sink.lock().push(event.clone()));

        Ok(Self {
            pager,
            host: host_log,
            surface: surface_log,
            indicator: indicator_log,
            events,
            pending: None,
            next_id: 0,
        })
    }

    /// Run one command, returning the reply line followed by any events it fired
    pub fn handle(&mut self, cmd: &Command) -> Vec<String> {
        let reply = match self.dispatch(cmd) {
            Ok(reply) => reply,
            Err(e) => format!("ERR {}", e),
        };

        let mut lines = vec![reply];
        lines.extend(
            self.events
                .lock()
                .drain(..)
                .map(|event| format!("EVENT {}", event)),
        );
        lines
    }

    fn dispatch(&mut self, cmd: &Command) -> Result<String> {
        debug!(command = %cmd.name, args = cmd.args.len(), "dispatch");

        match cmd.name.as_str() {
            "set" => self.handle_set(&cmd.args),
            "add" => self.handle_add(&cmd.args),
            "remove" => self.handle_remove(&cmd.args),
            "scroll" => self.handle_scroll(&cmd.args),
            "finish" => self.handle_finish(),
            "drag" => {
                self.pager.on_drag_started();
                Ok("OK".to_string())
            }
            "move" => self.handle_move(&cmd.args),
            "settle" => self.handle_settle(&cmd.args),
            "reload" => {
                self.pager.reload_data();
                self.pending = None;
                Ok("OK".to_string())
            }
            "release" => Ok(format!("OK released {}", self.pager.release_offscreen())),
            "cache" => {
                let size = int_arg(&cmd.args, 0, "cache")?;
                let size = usize::try_from(size).map_err(|_| {
                    Error::InvalidArgument(format!("cache size {} is negative", size))
                })?;
                self.pager.set_cache_size(size)?;
                Ok("OK".to_string())
            }
            "fail" => {
                let id = id_arg(&cmd.args, 0, "fail")?;
                self.host.lock().failing.insert(id);
                Ok("OK".to_string())
            }
            "status" => Ok(self.status()),
            _ => Err(Error::InvalidArgument(format!(
                "unknown command '{}'",
                cmd.name
            ))),
        }
    }

    fn handle_set(&mut self, args: &[Arg]) -> Result<String> {
        let count = int_arg(args, 0, "set")?;
        let count = usize::try_from(count)
            .map_err(|_| Error::InvalidArgument(format!("page count {} is negative", count)))?;

        let pages = (0..count).map(|_| self.fresh_proxy()).collect();
        self.pager.set_views(pages)?;
        self.pending = None;
        Ok(format!("OK {} pages", count))
    }

    fn handle_add(&mut self, args: &[Arg]) -> Result<String> {
        let at = match args.first() {
            Some(_) => Some(checked_insert_index(
                int_arg(args, 0, "add")?,
                self.pager.page_count(),
            )?),
            None => None,
        };

        let proxy = self.fresh_proxy();
        let id = self.next_id;
        let index = self.pager.add_view(proxy, at)?;
        Ok(format!("OK #{} at {}", id, index))
    }

    fn handle_remove(&mut self, args: &[Arg]) -> Result<String> {
        let target = match args {
            [Arg::Word(kind), _] if kind == "id" => PageRef::Id(id_arg(args, 1, "remove")?),
            _ => PageRef::Index(checked_index(
                int_arg(args, 0, "remove")?,
                self.pager.page_count(),
            )?),
        };

        let removed = self.pager.remove_view(target)?;
        Ok(format!("OK removed {}", removed.title()))
    }

    fn handle_scroll(&mut self, args: &[Arg]) -> Result<String> {
        let index = checked_index(int_arg(args, 0, "scroll")?, self.pager.page_count())?;
        let animated = matches!(args.get(1), Some(Arg::Word(mode)) if mode == "animated");

        match self.pager.scroll_to_page(index, animated)? {
            ScrollOutcome::Unchanged => Ok("OK unchanged".to_string()),
            ScrollOutcome::Settled => Ok(format!("OK at {}", index)),
            ScrollOutcome::Pending(id) => {
                self.pending = Some(id);
                Ok(format!("OK scrolling to {}", index))
            }
        }
    }

    fn handle_finish(&mut self) -> Result<String> {
        let id = self
            .pending
            .take()
            .ok_or_else(|| Error::NotFound("no animation in flight".to_string()))?;

        if self.pager.on_scroll_animation_finished(id) {
            Ok("OK".to_string())
        } else {
            Ok("OK stale".to_string())
        }
    }

    fn handle_move(&mut self, args: &[Arg]) -> Result<String> {
        let position = checked_index(int_arg(args, 0, "move")?, self.pager.page_count())?;
        let offset = match args.get(1) {
            Some(Arg::Float(offset)) => *offset as f32,
            Some(Arg::Int(offset)) => *offset as f32,
            None => 0.0,
            Some(other) => {
                return Err(Error::InvalidArgument(format!(
                    "offset must be a number, got {:?}",
                    other
                )))
            }
        };

        self.pager.on_scrolled(position, offset);
        Ok("OK".to_string())
    }

    fn handle_settle(&mut self, args: &[Arg]) -> Result<String> {
        let raw = int_arg(args, 0, "settle")?;
        self.surface.lock().visible = usize::try_from(raw).ok();

        self.pager.on_scroll_settled()?;
        self.pending = None;
        Ok("OK".to_string())
    }

    fn status(&self) -> String {
        let stats = self.pager.cache_stats();
        let indicator = self.indicator.lock();
        let host = self.host.lock();

        json!({
            "pages": self.pager.page_count(),
            "current": self.pager.current_page(),
            "state": format!("{:?}", self.pager.state()),
            "cacheSize": self.pager.cache_size(),
            "cached": self.pager.cached_pages(),
            "indicator": indicator.state,
            "label": indicator.state.label(),
            "liveViews": host.live_views(),
            "stats": {
                "hits": stats.hits(),
                "misses": stats.misses(),
                "evictions": stats.evictions(),
                "overflows": stats.overflows(),
            },
        })
        .to_string()
    }

    fn fresh_proxy(&mut self) -> MemoryProxy {
        self.next_id += 1;
        MemoryProxy::new(self.next_id, format!("page {}", self.next_id))
    }
}

fn int_arg(args: &[Arg], position: usize, command: &str) -> Result<i64> {
    match args.get(position) {
        Some(Arg::Int(value)) => Ok(*value),
        Some(other) => Err(Error::InvalidArgument(format!(
            "'{}' expects an integer, got {:?}",
            command, other
        ))),
        None => Err(Error::InvalidArgument(format!(
            "wrong number of arguments for '{}'",
            command
        ))),
    }
}

fn id_arg(args: &[Arg], position: usize, command: &str) -> Result<ProxyId> {
    let raw = int_arg(args, position, command)?;
    u64::try_from(raw)
        .map(ProxyId)
        .map_err(|_| Error::InvalidArgument(format!("page id {} is negative", raw)))
}
