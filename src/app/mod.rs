//! 应用模块
//!
//! 安装在节点上的应用：流量发生器与接收端。两者共享同一套启动/停止生命周期，
//! 由 `StartApplication` / `StopApplication` 事件驱动。

mod generator;
mod sink;

pub use generator::{GeneratorConfig, SendPacket, TrafficGenerator};
pub use sink::PacketSink;

use crate::net::{ApplicationId, NodeId, WlanWorld};
use crate::sim::{Event, SimError, SimTime, Simulator, World};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("port {port} is already bound on node {node:?}")]
    PortInUse { node: NodeId, port: u16 },
    #[error("application window is empty: start {start:?} is not before stop {stop:?}")]
    EmptyWindow { start: SimTime, stop: SimTime },
}

/// 应用的活动窗口 `[start, stop)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppWindow {
    pub start: SimTime,
    pub stop: SimTime,
}

/// 节点上的应用
#[derive(Debug)]
pub enum Application {
    Generator(TrafficGenerator),
    Sink(PacketSink),
}

impl Application {
    pub fn node(&self) -> NodeId {
        match self {
            Application::Generator(g) => g.node(),
            Application::Sink(s) => s.node(),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Application::Generator(g) => g.is_active(),
            Application::Sink(s) => s.is_active(),
        }
    }

    fn start(&mut self, id: ApplicationId, window: AppWindow, sim: &mut Simulator) {
        match self {
            Application::Generator(g) => g.start(id, window, sim),
            Application::Sink(s) => s.start(),
        }
    }

    fn stop(&mut self, sim: &mut Simulator) {
        match self {
            Application::Generator(g) => g.stop(sim),
            Application::Sink(s) => s.stop(),
        }
    }
}

#[derive(Debug)]
struct Installed {
    app: Application,
    window: AppWindow,
}

/// 已安装应用的容器
#[derive(Debug, Default)]
pub struct Applications {
    installed: Vec<Installed>,
    /// (节点, 端口) -> sink
    sockets: HashMap<(NodeId, u16), ApplicationId>,
}

impl Applications {
    /// 安装应用；sink 会绑定到它的本地端口
    pub fn install(
        &mut self,
        app: Application,
        window: AppWindow,
    ) -> Result<ApplicationId, AppError> {
        if window.start >= window.stop {
            return Err(AppError::EmptyWindow {
                start: window.start,
                stop: window.stop,
            });
        }
        let id = ApplicationId(self.installed.len());
        if let Application::Sink(sink) = &app {
            let key = (sink.node(), sink.local().port());
            if self.sockets.contains_key(&key) {
                return Err(AppError::PortInUse {
                    node: key.0,
                    port: key.1,
                });
            }
            self.sockets.insert(key, id);
        }
        debug!(app = ?id, node = ?app.node(), ?window, "安装应用");
        self.installed.push(Installed { app, window });
        Ok(id)
    }

    /// 为每个应用调度启动与停止事件
    pub fn schedule_lifecycle(&self, sim: &mut Simulator) -> Result<(), SimError> {
        for (idx, inst) in self.installed.iter().enumerate() {
            let app = ApplicationId(idx);
            sim.schedule(inst.window.start, StartApplication { app })?;
            sim.schedule(inst.window.stop, StopApplication { app })?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.installed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }

    pub fn get(&self, id: ApplicationId) -> Option<&Application> {
        self.installed.get(id.0).map(|inst| &inst.app)
    }

    pub fn window(&self, id: ApplicationId) -> Option<AppWindow> {
        self.installed.get(id.0).map(|inst| inst.window)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ApplicationId, &Application)> {
        self.installed
            .iter()
            .enumerate()
            .map(|(idx, inst)| (ApplicationId(idx), &inst.app))
    }

    pub fn sinks(&self) -> impl Iterator<Item = &PacketSink> {
        self.installed.iter().filter_map(|inst| match &inst.app {
            Application::Sink(s) => Some(s),
            Application::Generator(_) => None,
        })
    }

    pub fn generators(&self) -> impl Iterator<Item = &TrafficGenerator> {
        self.installed.iter().filter_map(|inst| match &inst.app {
            Application::Generator(g) => Some(g),
            Application::Sink(_) => None,
        })
    }

    pub(crate) fn generator_mut(&mut self, id: ApplicationId) -> Option<&mut TrafficGenerator> {
        match self.installed.get_mut(id.0).map(|inst| &mut inst.app) {
            Some(Application::Generator(g)) => Some(g),
            _ => None,
        }
    }

    /// 绑定在 (node, port) 上的 sink
    pub(crate) fn sink_on(&mut self, node: NodeId, port: u16) -> Option<&mut PacketSink> {
        let id = *self.sockets.get(&(node, port))?;
        match self.installed.get_mut(id.0).map(|inst| &mut inst.app) {
            Some(Application::Sink(s)) => Some(s),
            _ => None,
        }
    }
}

/// 事件：启动应用
#[derive(Debug)]
pub struct StartApplication {
    pub app: ApplicationId,
}

impl Event for StartApplication {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<WlanWorld>()
            .expect("world must be WlanWorld");
        if let Some(inst) = w.apps.installed.get_mut(self.app.0) {
            debug!(app = ?self.app, now = ?sim.now(), "▶️  应用启动");
            inst.app.start(self.app, inst.window, sim);
        }
    }
}

/// 事件：停止应用，取消它还在排队的事件
#[derive(Debug)]
pub struct StopApplication {
    pub app: ApplicationId,
}

impl Event for StopApplication {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<WlanWorld>()
            .expect("world must be WlanWorld");
        if let Some(inst) = w.apps.installed.get_mut(self.app.0) {
            debug!(app = ?self.app, now = ?sim.now(), "⏹️  应用停止");
            inst.app.stop(sim);
        }
    }
}
