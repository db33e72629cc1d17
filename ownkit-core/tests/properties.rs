use std::collections::HashSet;

use ownkit_core::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum HeapOp {
    Allocate(usize),
    Free(usize),
}

fn heap_op() -> impl Strategy<Value = HeapOp> {
    prop_oneof![
        (0usize..160).prop_map(HeapOp::Allocate),
        (0usize..16).prop_map(HeapOp::Free),
    ]
}

fn policy() -> impl Strategy<Value = SearchPolicy> {
    prop_oneof![Just(SearchPolicy::LinearScan), Just(SearchPolicy::FreeStack)]
}

proptest! {
    #[test]
    fn new_buffer_is_empty_and_terminated(capacity in 1usize..4096) {
        let buf = BoundedBuffer::new(capacity).unwrap();
        prop_assert_eq!(buf.len(), 0);
        prop_assert_eq!(buf.capacity(), capacity);
        prop_assert_eq!(buf.as_bytes_with_nul(), &[0u8][..]);
    }

    #[test]
    fn append_grows_by_line_or_changes_nothing(
        capacity in 1usize..128,
        lines in prop::collection::vec("[a-zA-Z0-9 ,.!?']{0,40}", 0..12),
    ) {
        let mut buf = BoundedBuffer::new(capacity).unwrap();
        for line in &lines {
            let before = buf.as_bytes().to_vec();
            let fits = buf.len() + line.len() + 2 <= capacity;
            prop_assert_eq!(buf.append_line(line), fits);
            if fits {
                prop_assert_eq!(buf.len(), before.len() + line.len() + 1);
                prop_assert!(buf.as_bytes().starts_with(&before));
            } else {
                prop_assert_eq!(buf.as_bytes(), &before[..]);
            }
            prop_assert_eq!(buf.as_bytes_with_nul()[buf.len()], 0);
            prop_assert!(buf.len() < buf.capacity());
        }
    }

    #[test]
    fn clone_then_mutate_leaves_original(
        seed in "[a-z]{0,20}",
        extra in "[a-z]{1,20}",
    ) {
        let mut original = BoundedBuffer::new(64).unwrap();
        original.append_line(&seed);
        let snapshot = original.as_str().to_owned();

        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        copy.append_line(&extra);

        prop_assert_eq!(original.as_str(), snapshot.as_str());
    }

    #[test]
    fn take_transfers_exactly(seed in "[a-z ]{0,30}") {
        let mut src = BoundedBuffer::new(40).unwrap();
        src.append_line(&seed);
        let expected = src.as_str().to_owned();

        let dst = src.take();
        prop_assert_eq!(dst.as_str(), expected.as_str());
        prop_assert_eq!(dst.capacity(), 40);
        prop_assert!(src.is_moved_from());
        prop_assert_eq!(src.len(), 0);
        prop_assert_eq!(src.capacity(), 0);
    }

    #[test]
    fn heap_never_double_issues_a_block(
        policy in policy(),
        ops in prop::collection::vec(heap_op(), 0..200),
    ) {
        let mut heap = BucketHeap::with_policy(16, 128, policy).unwrap();
        let mut outstanding: Vec<BlockHandle> = Vec::new();

        for op in ops {
            match op {
                HeapOp::Allocate(size) => match heap.allocate(size) {
                    Ok(handle) => {
                        prop_assert!(size <= 128);
                        prop_assert!(outstanding.iter().all(|h| h.addr() != handle.addr()));
                        outstanding.push(handle);
                    }
                    Err(CoreError::OutOfMemory { .. }) => {
                        prop_assert!(size > 128 || outstanding.len() == 16);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {other}"),
                },
                HeapOp::Free(slot) => {
                    if slot < outstanding.len() {
                        let handle = outstanding.swap_remove(slot);
                        prop_assert!(heap.free(handle));
                    }
                }
            }
            prop_assert_eq!(heap.in_use(), outstanding.len());
            prop_assert!(heap.in_use() <= heap.block_count());
        }

        let distinct: HashSet<_> = outstanding.iter().map(|h| h.addr()).collect();
        prop_assert_eq!(distinct.len(), outstanding.len());
    }
}
