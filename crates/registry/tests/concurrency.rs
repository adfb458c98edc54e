pub mod fixtures;

use fixtures::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier, mpsc};
use std::thread;
use symloc_cache::{CachedLookup, ExternalCache, MokaCache};
use symloc_domain::snapshot::PrefixDirs;
use symloc_registry::{Registry, ResolverChain};

#[test]
fn test_mutation_before_spawn_is_visible_in_worker() {
    let tree = source_tree(&["Foo.php"]);
    let registry = Registry::new();
    registry.add_hierarchical("App\\", [tree.path()], false).unwrap();

    let worker = {
        let registry = registry.clone();
        thread::spawn(move || registry.find_file("App\\Foo"))
    };

    assert_eq!(worker.join().unwrap(), Some(tree.path().join("Foo.php")));
}

#[test]
fn test_worker_mutation_is_visible_after_join() {
    let tree = source_tree(&["Pear/Foo.php"]);
    let registry = Registry::new();

    let worker = {
        let registry = registry.clone();
        let dir = tree.path().to_path_buf();
        thread::spawn(move || registry.add("Pear_", [dir], false))
    };
    worker.join().unwrap().unwrap();

    assert_eq!(registry.find_file("Pear_Foo"), Some(tree.path().join("Pear").join("Foo.php")));
}

#[test]
fn test_worker_resolves_after_handshake() {
    let tree = source_tree(&["Foo.php"]);
    let chain = ResolverChain::new();
    let registry = Registry::new();
    registry.register(&chain, false).unwrap();

    let (ready_tx, ready_rx) = mpsc::channel::<()>();
    let (go_tx, go_rx) = mpsc::channel::<()>();

    let worker = {
        let chain = chain.clone();
        thread::spawn(move || {
            ready_tx.send(()).unwrap();
            go_rx.recv().unwrap();
            chain.load("Namespaced\\Foo")
        })
    };

    ready_rx.recv().unwrap();
    registry.add_hierarchical("Namespaced\\", [tree.path()], false).unwrap();
    go_tx.send(()).unwrap();

    assert!(worker.join().unwrap().unwrap());
}

#[test]
fn test_lookup_racing_a_mutation_caches_nothing() {
    let src = source_tree(&["Foo.php"]);
    let empty = source_tree(&[]);
    let (gate, control) = Gate::new();
    let cache = Arc::new(MokaCache::default());
    let registry = Registry::builder()
        .filesystem(Arc::new(GatedFilesystem(gate)))
        .external_cache(cache.clone())
        .build();
    registry.set_external_cache_key_prefix(Some("app:".to_owned()));
    registry.add("", [empty.path()], false).unwrap();

    let worker = {
        let registry = registry.clone();
        thread::spawn(move || registry.find_file("App\\Foo"))
    };

    control.wait_entered();
    registry.add_hierarchical("App\\", [src.path()], false).unwrap();
    control.open();

    assert_eq!(worker.join().unwrap(), None);
    assert!(registry.missing_symbols().is_empty());
    assert_eq!(cache.get("app:App\\Foo"), None);
    assert_eq!(registry.find_file("App\\Foo"), Some(src.path().join("Foo.php")));
}

#[test]
fn test_mutation_during_cache_store_evicts_stale_entry() {
    let src = source_tree(&["Foo.php"]);
    let empty = source_tree(&[]);
    let (gate, control) = Gate::new();
    let cache = Arc::new(GatedCache { inner: MokaCache::default(), gate });
    let registry = Registry::builder().external_cache(cache.clone()).build();
    registry.set_external_cache_key_prefix(Some("app:".to_owned()));
    registry.add("", [empty.path()], false).unwrap();

    let worker = {
        let registry = registry.clone();
        thread::spawn(move || registry.find_file("App\\Foo"))
    };

    control.wait_entered();
    registry.add_hierarchical("App\\", [src.path()], false).unwrap();
    control.open();

    assert_eq!(worker.join().unwrap(), None);
    assert_eq!(cache.get("app:App\\Foo"), None);

    let found = Some(src.path().join("Foo.php"));
    assert_eq!(registry.find_file("App\\Foo"), found);
    assert_eq!(cache.get("app:App\\Foo"), Some(CachedLookup::from(found)));
}

#[test]
fn test_concurrent_readers_never_see_torn_replace() {
    let before = source_tree(&["Foo.php"]);
    let after = source_tree(&["Foo.php"]);
    let registry = Registry::new();
    registry.set_hierarchical("App\\", [before.path()]).unwrap();

    let old = vec![PrefixDirs::new("App\\", [before.path()])];
    let new = vec![PrefixDirs::new("App\\", [after.path()])];
    let done = Arc::new(AtomicBool::new(false));
    let start = Arc::new(Barrier::new(5));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            let (old, new) = (old.clone(), new.clone());
            let (done, start) = (done.clone(), start.clone());
            let expected = [before.path().join("Foo.php"), after.path().join("Foo.php")];
            thread::spawn(move || {
                start.wait();
                while !done.load(Ordering::Acquire) {
                    let seen = registry.prefixes_hierarchical();
                    assert!(seen == old || seen == new, "torn prefix table: {seen:?}");

                    let found = registry.find_file("App\\Foo");
                    assert!(found.as_ref().is_some_and(|p| expected.contains(p)), "{found:?}");
                }
            })
        })
        .collect();

    start.wait();
    for round in 0..500 {
        let dir = if round % 2 == 0 { after.path() } else { before.path() };
        registry.set_hierarchical("App\\", [dir]).unwrap();
    }
    registry.set_hierarchical("App\\", [after.path()]).unwrap();
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(registry.prefixes_hierarchical(), new);
}

#[test]
fn test_concurrent_prepends_keep_groups_intact() {
    let registry = Registry::new();
    let start = Arc::new(Barrier::new(8));

    let writers: Vec<_> = (0..8)
        .map(|n| {
            let registry = registry.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                let group = [format!("w{n}-a"), format!("w{n}-b")];
                registry.add("Shared_", group, n % 2 == 0).unwrap();
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let dirs = &registry.prefixes()[0].paths;
    assert_eq!(dirs.len(), 16);
    for pair in dirs.chunks(2) {
        let a = pair[0].to_string_lossy().into_owned();
        let b = pair[1].to_string_lossy().into_owned();
        assert_eq!(a.trim_end_matches("-a"), b.trim_end_matches("-b"), "group split: {dirs:?}");
    }
}

#[test]
fn test_concurrent_add_file_materializes_once() {
    let tree = source_tree(&["helpers.php"]);
    let (registry, _, materializer) = instrumented_registry();
    let chain = ResolverChain::new();
    let path = tree.path().join("helpers.php");
    let start = Arc::new(Barrier::new(8));

    let workers: Vec<_> = (0..8)
        .map(|n| {
            let (registry, chain) = (registry.clone(), chain.clone());
            let (path, start) = (path.clone(), start.clone());
            thread::spawn(move || {
                start.wait();
                if n % 2 == 0 {
                    registry.add_file("helpers", path, true)
                } else {
                    registry.add_file("helpers", path, false)?;
                    registry.register(&chain, false)
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap().unwrap();
    }

    assert_eq!(materializer.loaded(), vec![path]);
    assert_eq!(chain.len(), 1);
}

#[test]
fn test_handles_are_send_and_sync() {
    fn check<T: Send + Sync>() {}
    check::<Registry>();
    check::<ResolverChain>();
}
