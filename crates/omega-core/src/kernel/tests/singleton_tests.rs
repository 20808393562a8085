use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::thread;

use crate::kernel::singleton::{ConstructToken, Instance, Singleton, SingletonRegistry, SingletonViolation};

#[derive(Debug)]
struct Counter {
    seed: u32,
}

impl Singleton for Counter {
    type Args = u32;

    fn construct(seed: u32, _token: ConstructToken) -> Self {
        Counter { seed }
    }
}

#[derive(Debug)]
struct Gauge {
    seed: u32,
}

impl Singleton for Gauge {
    type Args = u32;

    fn construct(seed: u32, _token: ConstructToken) -> Self {
        Gauge { seed }
    }
}

#[test]
fn test_first_call_arguments_win() {
    let registry = SingletonRegistry::new();

    let first = Counter::instance_in(&registry, 40);
    let second = Counter::instance_in(&registry, 90);

    assert_eq!(first.seed, 40);
    assert_eq!(second.seed, 40, "Later construction arguments must be ignored");
    assert!(Instance::ptr_eq(&first, &second), "Both calls should return the same instance");
}

#[test]
fn test_types_have_independent_slots() {
    let registry = SingletonRegistry::new();

    let counter = Counter::instance_in(&registry, 40);
    let gauge = Gauge::instance_in(&registry, 90);

    assert_eq!(counter.seed, 40);
    assert_eq!(gauge.seed, 90);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_mutating_one_singleton_leaves_others_untouched() {
    struct Alpha(AtomicU32);
    impl Singleton for Alpha {
        type Args = ();
        fn construct(_: (), _token: ConstructToken) -> Self {
            Alpha(AtomicU32::new(0))
        }
    }

    struct Beta(AtomicU32);
    impl Singleton for Beta {
        type Args = ();
        fn construct(_: (), _token: ConstructToken) -> Self {
            Beta(AtomicU32::new(0))
        }
    }

    let registry = SingletonRegistry::new();
    Alpha::instance_in(&registry, ()).0.store(40, Ordering::SeqCst);
    Beta::instance_in(&registry, ()).0.store(90, Ordering::SeqCst);

    assert_eq!(Alpha::instance_in(&registry, ()).0.load(Ordering::SeqCst), 40);
    assert_eq!(Beta::instance_in(&registry, ()).0.load(Ordering::SeqCst), 90);
}

#[test]
fn test_registries_are_independent() {
    let one = SingletonRegistry::new();
    let two = SingletonRegistry::new();

    assert_eq!(Counter::instance_in(&one, 1).seed, 1);
    assert_eq!(Counter::instance_in(&two, 2).seed, 2);
}

#[test]
fn test_global_registry_returns_same_instance() {
    struct GlobalOnly;
    impl Singleton for GlobalOnly {
        type Args = ();
        fn construct(_: (), _token: ConstructToken) -> Self {
            GlobalOnly
        }
    }

    let first = GlobalOnly::instance(());
    let second = GlobalOnly::instance(());
    assert!(Instance::ptr_eq(&first, &second));
    assert!(SingletonRegistry::global().contains::<GlobalOnly>());
}

#[test]
fn test_get_before_and_after_init() {
    let registry = SingletonRegistry::new();
    assert!(registry.get::<Counter>().is_none());
    assert!(registry.is_empty());

    let created = Counter::instance_in(&registry, 7);
    let fetched = registry.get::<Counter>().expect("Instance should exist after init");
    assert!(Instance::ptr_eq(&created, &fetched));
    assert!(registry.contains::<Counter>());
    assert!(!registry.contains::<Gauge>());
}

#[test]
fn test_register_rejects_second_instance() {
    let registry = SingletonRegistry::new();
    let first = registry.register(Counter { seed: 1 }).expect("First register should succeed");

    let err = registry
        .register(Counter { seed: 2 })
        .expect_err("Second register should fail");
    assert!(matches!(err, SingletonViolation::AlreadyRegistered { .. }));
    assert!(err.type_name().ends_with("Counter"));

    let current = registry.get::<Counter>().unwrap();
    assert!(Instance::ptr_eq(&first, &current), "Existing instance must be kept");
    assert_eq!(current.seed, 1);
}

#[test]
fn test_initializer_runs_once_under_contention() {
    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct Expensive;
    impl Singleton for Expensive {
        type Args = ();
        fn construct(_: (), _token: ConstructToken) -> Self {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            Expensive
        }
    }

    let registry = SingletonRegistry::new();
    let handles: Vec<Instance<Expensive>> = thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| Expensive::instance_in(&registry, ())))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
    assert!(handles.windows(2).all(|pair| Instance::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn test_initializer_may_use_other_singletons() {
    struct Outer(u32);

    let registry = SingletonRegistry::new();
    let outer = registry.get_or_init(|| {
        let gauge = Gauge::instance_in(&registry, 5);
        Outer(gauge.seed * 2)
    });
    assert_eq!(outer.0, 10);
}

#[test]
fn test_serialize_is_refused() {
    let registry = SingletonRegistry::new();
    let counter = Counter::instance_in(&registry, 3);

    let err = serde_json::to_string(&counter).expect_err("Serializing a singleton must fail");
    assert!(
        err.to_string().contains("serialize attempted"),
        "Unexpected error message: {}",
        err
    );
}

#[test]
fn test_deserialize_is_refused() {
    let err = serde_json::from_str::<Instance<Counter>>(r#"{"seed": 3}"#)
        .expect_err("Deserializing a singleton must fail");
    assert!(
        err.to_string().contains("deserialize attempted"),
        "Unexpected error message: {}",
        err
    );
}

#[test]
fn test_violation_converts_into_kernel_error() {
    let violation = SingletonViolation::SerializeAttempted { type_name: "Counter" };
    let err: crate::kernel::Error = violation.into();
    assert!(matches!(err, crate::kernel::Error::SingletonViolation(_)));
    assert!(err.to_string().contains("serialize attempted on singleton 'Counter'"));
}
