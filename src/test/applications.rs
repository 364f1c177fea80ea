use crate::app::{AppError, AppWindow, Application, Applications, PacketSink};
use crate::net::NodeId;
use crate::sim::SimTime;
use std::net::{Ipv4Addr, SocketAddrV4};

fn sink(node: usize, port: u16) -> Application {
    Application::Sink(PacketSink::new(
        NodeId(node),
        SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 2), port),
    ))
}

fn window(start_ms: u64, stop_ms: u64) -> AppWindow {
    AppWindow {
        start: SimTime::from_millis(start_ms),
        stop: SimTime::from_millis(stop_ms),
    }
}

#[test]
fn install_assigns_sequential_ids_and_keeps_windows() {
    let mut apps = Applications::default();
    let a = apps.install(sink(0, 9), window(0, 10)).expect("a");
    let b = apps.install(sink(0, 10), window(1, 10)).expect("b");
    assert_eq!(a.0, 0);
    assert_eq!(b.0, 1);
    assert_eq!(apps.len(), 2);
    assert_eq!(apps.window(b), Some(window(1, 10)));
    assert_eq!(apps.sinks().count(), 2);
    assert_eq!(apps.generators().count(), 0);
    assert!(apps.iter().all(|(_, app)| !app.is_active()));
}

#[test]
fn install_rejects_a_port_already_bound_on_the_same_node() {
    let mut apps = Applications::default();
    apps.install(sink(0, 9), window(0, 10)).expect("first");
    assert_eq!(
        apps.install(sink(0, 9), window(0, 10)).err(),
        Some(AppError::PortInUse {
            node: NodeId(0),
            port: 9
        })
    );
    // 其他节点上的同一端口没有冲突
    assert!(apps.install(sink(1, 9), window(0, 10)).is_ok());
}

#[test]
fn install_rejects_empty_windows() {
    let mut apps = Applications::default();
    assert!(matches!(
        apps.install(sink(0, 9), window(5, 5)),
        Err(AppError::EmptyWindow { .. })
    ));
    assert!(apps.is_empty());
}
