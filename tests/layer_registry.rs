use pixelpad::error::EditorError;
use pixelpad::layer::LayerRegistry;

#[test]
fn a_fresh_registry_holds_one_background_layer() {
    let registry = LayerRegistry::new();
    assert_eq!(registry.len(), 1);
    let background = &registry.layers()[0];
    assert_eq!(background.name, "Background");
    assert_eq!(background.id.value(), 1);
    assert!(background.visible);
    assert_eq!(background.opacity, 1.0);
}

#[test]
fn deleting_the_last_layer_is_refused() {
    let mut registry = LayerRegistry::new();
    let result = registry.delete_layer(0);
    assert!(matches!(result, Err(EditorError::InvalidOperation(_))));
    assert_eq!(registry.len(), 1);
}

#[test]
fn deleting_out_of_range_is_refused() {
    let mut registry = LayerRegistry::new();
    registry.add_layer("Sketch");
    let result = registry.delete_layer(5);
    assert!(matches!(result, Err(EditorError::InvalidOperation(_))));
    assert_eq!(registry.len(), 2);
}

#[test]
fn identities_increase_and_are_never_reused() {
    let mut registry = LayerRegistry::new();
    let mut seen = vec![registry.layers()[0].id.value()];

    for round in 0..3 {
        for i in 0..3 {
            let id = registry.add_layer(&format!("Layer {round}-{i}"));
            seen.push(id.value());
        }
        // delete the newest two; their identities must stay retired
        let len = registry.len();
        registry.delete_layer(len - 1).unwrap();
        registry.delete_layer(len - 2).unwrap();
    }

    let mut sorted = seen.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), seen.len(), "identity was reused");
    assert!(seen.windows(2).all(|w| w[0] < w[1]), "identity not monotonic");
}

#[test]
fn boundary_moves_are_noops() {
    let mut registry = LayerRegistry::new();
    registry.add_layer("Sketch");
    let order: Vec<_> = registry.layers().iter().map(|l| l.id).collect();

    assert!(!registry.move_up(0));
    assert!(!registry.move_down(registry.len() - 1));
    assert!(!registry.move_up(99));
    assert!(!registry.move_down(99));

    let unchanged: Vec<_> = registry.layers().iter().map(|l| l.id).collect();
    assert_eq!(order, unchanged);
}

#[test]
fn neighbor_swaps_reorder_the_sequence() {
    let mut registry = LayerRegistry::new();
    registry.add_layer("Middle");
    registry.add_layer("Top");

    assert!(registry.move_up(2));
    let names: Vec<_> = registry.layers().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Background", "Top", "Middle"]);

    assert!(registry.move_down(0));
    let names: Vec<_> = registry.layers().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Top", "Background", "Middle"]);
}

/// The scripted end-to-end scenario: add, raise, delete, then refuse
/// deleting the survivor.
#[test]
fn layer_lifecycle_scenario() {
    let mut registry = LayerRegistry::new();
    assert_eq!(registry.layers()[0].id.value(), 1);

    registry.add_layer("Sketch");
    let pairs: Vec<_> = registry
        .layers()
        .iter()
        .map(|l| (l.id.value(), l.name.as_str()))
        .collect();
    assert_eq!(pairs, [(1, "Background"), (2, "Sketch")]);

    assert!(registry.move_up(1));
    let pairs: Vec<_> = registry
        .layers()
        .iter()
        .map(|l| (l.id.value(), l.name.as_str()))
        .collect();
    assert_eq!(pairs, [(2, "Sketch"), (1, "Background")]);

    registry.delete_layer(1).unwrap();
    let pairs: Vec<_> = registry
        .layers()
        .iter()
        .map(|l| (l.id.value(), l.name.as_str()))
        .collect();
    assert_eq!(pairs, [(2, "Sketch")]);

    let result = registry.delete_layer(0);
    assert!(matches!(result, Err(EditorError::InvalidOperation(_))));
    assert_eq!(registry.layers()[0].id.value(), 2);
}

#[test]
fn successful_mutations_bump_the_revision_and_refused_ones_do_not() {
    let mut registry = LayerRegistry::new();
    let start = registry.revision();

    registry.add_layer("Sketch");
    let after_add = registry.revision();
    assert!(after_add > start);

    assert!(!registry.move_up(0)); // boundary no-op
    assert_eq!(registry.revision(), after_add);

    let _ = registry.delete_layer(42); // refused
    assert_eq!(registry.revision(), after_add);

    registry.delete_layer(1).unwrap();
    assert!(registry.revision() > after_add);
}
