//! First use of a type from many threads at once

use std::sync::Barrier;
use std::thread;

use refl::{NameFacet, Reflect};

#[derive(Reflect)]
struct Root;

#[derive(Reflect)]
#[refl(extends(virtual Root))]
struct Left;

#[derive(Reflect)]
#[refl(extends(virtual Root))]
struct Right;

#[derive(Reflect)]
#[refl(extends(Left, Right))]
struct Wide {
    f0: u64,
    f1: u64,
    f2: u64,
    f3: u64,
    f4: u64,
    f5: u64,
    f6: u64,
    f7: u64,
}

const THREADS: usize = 8;

#[test]
fn test_racing_first_lookup() {
    let barrier = Barrier::new(THREADS);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    let info = refl::type_info::<Wide>();
                    let name = format!("f{}", i % 8);
                    let index = info.member_index(&name);
                    let table = info.index(NameFacet::Members) as *const _ as usize;
                    let virtual_bases = info.virtual_bases().as_ptr() as usize;
                    (i, index, table, virtual_bases)
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    let (_, _, table, virtual_bases) = results[0];
    for (i, index, other_table, other_virtual_bases) in results {
        assert_eq!(index, Some(i % 8));
        assert_eq!(other_table, table);
        assert_eq!(other_virtual_bases, virtual_bases);
    }
    assert_eq!(refl::virtual_base_index::<Wide>("Root"), Some(0));
}

#[test]
fn test_descriptor_is_shared() {
    let infos: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| scope.spawn(|| refl::type_info::<Left>() as *const _ as usize))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert!(infos.windows(2).all(|pair| pair[0] == pair[1]));
    let value = Wide {
        f0: 0,
        f1: 1,
        f2: 2,
        f3: 3,
        f4: 4,
        f5: 5,
        f6: 6,
        f7: 7,
    };
    assert_eq!(refl::member::<Wide>(7).get_as::<u64>(&value), Some(&value.f7));
    assert_eq!(
        value.f0 + value.f1 + value.f2 + value.f3 + value.f4 + value.f5 + value.f6,
        21
    );
}
