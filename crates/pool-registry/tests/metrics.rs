use pool_registry::{Directory, PoolRecord, eth::Address, pool::Coin};

fn gauge(name: &str) -> i64 {
    let encoded = observe::metrics::encode(observe::metrics::get_registry());
    encoded
        .lines()
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(' '))
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| panic!("{name} missing from\n{encoded}"))
}

#[test]
fn size_gauges_follow_racing_writers() {
    let directory = Directory::default();

    std::thread::scope(|scope| {
        for writer in 0..4u8 {
            let directory = &directory;
            scope.spawn(move || {
                for round in 0..25u8 {
                    let id = [writer + 1, round + 1];
                    let record = PoolRecord::new(
                        Address::left_padding_from(&[1, id[0], id[1]]),
                        Address::left_padding_from(&[2, id[0], id[1]]),
                        vec![
                            Coin::new(Address::repeat_byte(0x11), 6),
                            Coin::new(Address::left_padding_from(&[3, id[0], id[1]]), 18),
                        ],
                    );
                    directory.register_pool(record).unwrap();
                }
            });
        }
    });

    let pools = directory.pools();
    assert_eq!(pools.pool_count(), 100);
    assert_eq!(gauge("pool_registry_pools"), 100);
    assert_eq!(gauge("pool_registry_coins"), 101);

    directory
        .remove_pool(Address::left_padding_from(&[1, 1, 1]))
        .unwrap();
    assert_eq!(gauge("pool_registry_pools"), 99);
    assert_eq!(gauge("pool_registry_coins"), 100);
}
