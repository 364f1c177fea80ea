use crate::net::{AddressError, Ipv4AddressAllocator};
use std::net::Ipv4Addr;

#[test]
fn allocator_hands_out_consecutive_hosts_from_dot_one() {
    let mut alloc = Ipv4AddressAllocator::new(Ipv4Addr::new(192, 168, 1, 0), 24).expect("alloc");
    assert_eq!(alloc.capacity(), 254);
    assert_eq!(alloc.allocate(), Ok(Ipv4Addr::new(192, 168, 1, 1)));
    assert_eq!(alloc.allocate(), Ok(Ipv4Addr::new(192, 168, 1, 2)));
    assert_eq!(alloc.remaining(), 252);
}

#[test]
fn allocator_masks_host_bits_of_network_address() {
    let mut alloc = Ipv4AddressAllocator::new(Ipv4Addr::new(10, 0, 0, 77), 24).expect("alloc");
    assert_eq!(alloc.network(), Ipv4Addr::new(10, 0, 0, 0));
    assert_eq!(alloc.allocate(), Ok(Ipv4Addr::new(10, 0, 0, 1)));
}

#[test]
fn allocator_reports_exhaustion_instead_of_broadcast() {
    let mut alloc = Ipv4AddressAllocator::new(Ipv4Addr::new(192, 168, 1, 0), 30).expect("alloc");
    assert_eq!(alloc.allocate(), Ok(Ipv4Addr::new(192, 168, 1, 1)));
    assert_eq!(alloc.allocate(), Ok(Ipv4Addr::new(192, 168, 1, 2)));
    assert_eq!(
        alloc.allocate(),
        Err(AddressError::Exhausted {
            network: Ipv4Addr::new(192, 168, 1, 0),
            prefix_len: 30
        })
    );
}

#[test]
fn allocator_rejects_prefixes_without_host_range() {
    assert_eq!(
        Ipv4AddressAllocator::new(Ipv4Addr::new(192, 168, 1, 0), 31).err(),
        Some(AddressError::InvalidPrefix(31))
    );
    assert_eq!(
        Ipv4AddressAllocator::new(Ipv4Addr::new(0, 0, 0, 0), 0).err(),
        Some(AddressError::InvalidPrefix(0))
    );
}

#[test]
fn allocator_widest_prefix_has_full_capacity() {
    let alloc = Ipv4AddressAllocator::new(Ipv4Addr::new(10, 0, 0, 0), 1).expect("alloc");
    assert_eq!(alloc.network(), Ipv4Addr::new(0, 0, 0, 0));
    assert_eq!(alloc.capacity(), (1u32 << 31) - 2);
}

#[test]
fn network_attaches_typed_interfaces_and_resolves_addresses() {
    use crate::net::{EPHEMERAL_PORT_START, MediumConfig, Network, NodeRole};

    let mut net = Network::new(MediumConfig::default());
    let ap = net.add_node("ap", NodeRole::AccessPoint);
    let sta = net.add_node("sta0", NodeRole::Station);
    let mut alloc = Ipv4AddressAllocator::new(Ipv4Addr::new(192, 168, 1, 0), 24).expect("alloc");
    let sta_addr = net.assign_address(sta, "wlan0", &mut alloc).expect("sta addr");
    let ap_addr = net.assign_address(ap, "wlan0", &mut alloc).expect("ap addr");

    let node = net.node(ap).expect("ap node");
    assert_eq!(node.role(), NodeRole::AccessPoint);
    assert_eq!(node.name(), "ap");
    assert_eq!(node.address("wlan0"), Some(ap_addr));
    assert_eq!(node.address("eth0"), None);
    assert_eq!(node.interfaces().count(), 1);
    assert_eq!(net.resolve(sta_addr), Some(sta));
    assert_eq!(net.resolve(Ipv4Addr::new(10, 0, 0, 1)), None);

    let first = net.bind_ephemeral(sta).expect("bind");
    let second = net.bind_ephemeral(sta).expect("bind");
    assert_eq!(*first.ip(), sta_addr);
    assert_eq!(first.port(), EPHEMERAL_PORT_START);
    assert_eq!(second.port(), EPHEMERAL_PORT_START + 1);
    assert_eq!(net.nodes().count(), 2);
}
