//! End-to-end registry scenarios.

use std::sync::Arc;

use tessera_core::diagnostics::{DiagnosticLog, Severity};
use tessera_core::{EcsError, IdKind, Registry, RegistryConfig, Signature};

fn registry() -> (Registry, Arc<DiagnosticLog>) {
    registry_with(RegistryConfig::default())
}

fn registry_with(config: RegistryConfig) -> (Registry, Arc<DiagnosticLog>) {
    let log = Arc::new(DiagnosticLog::new());
    let mut registry = Registry::with_sink(config, log.clone()).unwrap();
    registry.register_component::<i32>().unwrap();
    registry.register_component::<f32>().unwrap();
    (registry, log)
}

#[test]
fn test_attach_two_components() {
    let (mut registry, _) = registry();
    let x = registry.create_entity().unwrap();
    registry.attach(x, 5i32).unwrap();
    registry.attach(x, 7.0f32).unwrap();

    let int_id = registry.component_id::<i32>().unwrap();
    let float_id = registry.component_id::<f32>().unwrap();
    assert_eq!(
        registry.signature_of(x).unwrap(),
        Signature::from_ids(&[int_id, float_id])
    );
    assert_eq!(*registry.get::<i32>(x).unwrap(), 5);
    assert_eq!(*registry.get::<f32>(x).unwrap(), 7.0);
}

#[test]
fn test_detach_then_detach_again() {
    let (mut registry, log) = registry();
    let x = registry.create_entity().unwrap();
    registry.attach(x, 5i32).unwrap();
    registry.attach(x, 7.0f32).unwrap();

    assert_eq!(registry.detach::<f32>(x).unwrap(), 7.0);
    let int_id = registry.component_id::<i32>().unwrap();
    assert_eq!(registry.signature_of(x).unwrap(), Signature::from_ids(&[int_id]));
    assert_eq!(*registry.get::<i32>(x).unwrap(), 5);

    let err = registry.detach::<f32>(x).unwrap_err();
    assert!(matches!(err, EcsError::MissingComponent { .. }));
    assert!(!err.is_fatal());
    assert_eq!(log.count_at_least(Severity::Error), 1);
    assert_eq!(log.count_at_least(Severity::Fatal), 0);
    assert_eq!(*registry.get::<i32>(x).unwrap(), 5);
}

#[test]
fn test_iterate_exact_archetype() {
    let (mut registry, _) = registry();
    let x = registry.create_entity().unwrap();
    registry.attach(x, 5i32).unwrap();
    registry.attach(x, 7.0f32).unwrap();
    let y = registry.create_entity().unwrap();
    registry.attach(y, 4i32).unwrap();
    registry.attach(y, 3.5f32).unwrap();
    // Only {int} - must not show up.
    registry.spawn((99i32,)).unwrap();

    let mut pairs: Vec<(i32, f32)> = registry
        .iterate::<(i32, f32)>()
        .unwrap()
        .map(|(number, real)| (*number, *real))
        .collect();
    pairs.sort_by_key(|(number, _)| *number);
    assert_eq!(pairs, vec![(4, 3.5), (5, 7.0)]);

    // Tuple order does not pick a different archetype.
    assert_eq!(registry.iterate::<(f32, i32)>().unwrap().count(), 2);
}

#[test]
fn test_iterate_without_archetype_is_empty() {
    let (registry, log) = registry();
    assert_eq!(registry.iterate::<(i32, f32)>().unwrap().count(), 0);
    assert!(log.is_empty());
}

#[test]
fn test_iterate_unregistered_reports() {
    let (registry, log) = registry();
    assert!(matches!(
        registry.iterate::<(u64,)>(),
        Err(EcsError::Unregistered(_))
    ));
    assert_eq!(log.count_at_least(Severity::Error), 1);
}

#[test]
fn test_destroyed_slot_not_aliased() {
    let (mut registry, _) = registry();
    let z = registry.create_entity().unwrap();
    registry.attach(z, 4i32).unwrap();
    registry.destroy_entity(z).unwrap();

    let fresh = registry.create_entity().unwrap();
    assert_eq!(fresh.id(), z.id());
    assert!(!registry.has::<i32>(fresh));
    assert!(matches!(
        registry.get::<i32>(fresh),
        Err(EcsError::MissingComponent { .. })
    ));
    assert_eq!(registry.iterate::<(i32,)>().unwrap().count(), 0);

    registry.attach(fresh, 8i32).unwrap();
    assert_eq!(*registry.get::<i32>(fresh).unwrap(), 8);
}

#[test]
fn test_entity_capacity_exhaustion_is_fatal() {
    let config = RegistryConfig {
        entity_capacity: 3,
        ..RegistryConfig::default()
    };
    let (mut registry, log) = registry_with(config);

    let ids: Vec<u32> = (0..3)
        .map(|_| registry.create_entity().unwrap().id())
        .collect();
    assert_eq!(ids, vec![0, 1, 2]);

    let err = registry.create_entity().unwrap_err();
    assert_eq!(
        err,
        EcsError::CapacityExhausted {
            kind: IdKind::Entity,
            capacity: 3
        }
    );
    assert_eq!(log.count_at_least(Severity::Fatal), 1);
    assert_eq!(registry.entity_count(), 3);
}

#[test]
fn test_directory_survives_mixed_churn() {
    let (mut registry, _) = registry();
    let entities: Vec<_> = (0..32)
        .map(|n| registry.spawn((n, n as f32)).unwrap())
        .collect();

    for (n, &entity) in entities.iter().enumerate() {
        match n % 4 {
            0 => registry.destroy_entity(entity).unwrap(),
            1 => {
                registry.detach::<f32>(entity).unwrap();
            }
            2 => {
                registry.detach::<i32>(entity).unwrap();
            }
            _ => {}
        }
        assert!(registry.is_consistent());
    }

    for (n, &entity) in entities.iter().enumerate() {
        let n = n as i32;
        match n % 4 {
            0 => assert!(!registry.is_alive(entity)),
            1 => {
                assert_eq!(*registry.get::<i32>(entity).unwrap(), n);
                assert!(!registry.has::<f32>(entity));
            }
            2 => {
                assert_eq!(*registry.get::<f32>(entity).unwrap(), n as f32);
                assert!(!registry.has::<i32>(entity));
            }
            _ => {
                assert_eq!(*registry.get::<i32>(entity).unwrap(), n);
                assert_eq!(*registry.get::<f32>(entity).unwrap(), n as f32);
            }
        }
    }
}

#[test]
fn test_iterate_mut_updates_in_place() {
    let (mut registry, _) = registry();
    let entities: Vec<_> = (0..10)
        .map(|n| registry.spawn((n, 1.0f32)).unwrap())
        .collect();

    for (number, real) in registry.iterate_mut::<(i32, f32)>().unwrap() {
        *real += *number as f32;
    }

    for (n, &entity) in entities.iter().enumerate() {
        assert_eq!(*registry.get::<f32>(entity).unwrap(), 1.0 + n as f32);
    }
}

#[test]
fn test_registries_do_not_share_component_ids() {
    let mut a = Registry::new().unwrap();
    let mut b = Registry::new().unwrap();
    a.register_component::<i32>().unwrap();
    b.register_component::<f32>().unwrap();
    b.register_component::<i32>().unwrap();

    assert_eq!(a.component_id::<i32>(), Some(0));
    assert_eq!(b.component_id::<i32>(), Some(1));
    assert_eq!(a.component_id::<f32>(), None);
}

#[test]
fn test_config_from_toml() {
    let config = RegistryConfig::from_toml_str(
        r#"
        entity_capacity = 16
        sparse_page_size = 4
        initial_column_capacity = 8
        "#,
    )
    .unwrap();
    let (mut registry, _) = registry_with(config);

    for n in 0..16 {
        registry.spawn((n,)).unwrap();
    }
    assert!(registry.create_entity().is_err());
    assert_eq!(registry.iterate::<(i32,)>().unwrap().count(), 16);
}
