//! Resource registry unit tests.
//!
//! Verifies base-map inheritance, derived-entry precedence, index
//! uniqueness in both tables, and lookup behavior after freezing.

use fabsim_core::common::{ConfigError, TableKind};
use fabsim_core::registry::{BASE_CSR_SLOTS, RegistryBuilder};

// ══════════════════════════════════════════════════════════
// 1. Base inheritance
// ══════════════════════════════════════════════════════════

#[test]
fn base_slots_cover_zero_through_sixteen() {
    let mut indices: Vec<usize> = BASE_CSR_SLOTS.iter().map(|&(_, i)| i).collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..=16).collect::<Vec<_>>());
}

#[test]
fn with_base_resolves_inherited_names() {
    let registry = RegistryBuilder::with_base().build();
    assert_eq!(registry.csr_index("uart").unwrap(), 2);
    assert_eq!(registry.csr_index("identifier_mem").unwrap(), 3);
    assert_eq!(registry.interrupt_index("uart").unwrap(), 2);
    assert_eq!(registry.interrupt_index("timer0").unwrap(), 3);
}

// ══════════════════════════════════════════════════════════
// 2. Registration and collisions
// ══════════════════════════════════════════════════════════

#[test]
fn registers_above_base_indices() {
    // The composition scenario: derived entries land just past the base.
    let mut builder = RegistryBuilder::with_base();
    builder.csr("ddrphy", 17).unwrap();
    builder.csr("dma", 21).unwrap();
    let registry = builder.build();
    assert_eq!(registry.csr_index("ddrphy").unwrap(), 17);
    assert_eq!(registry.csr_index("dma").unwrap(), 21);
}

#[test]
fn index_collision_reports_name_and_holder() {
    let mut builder = RegistryBuilder::with_base();
    builder.csr("ddrphy", 17).unwrap();
    let err = builder.csr("dma", 17).unwrap_err();
    assert_eq!(
        err,
        ConfigError::IndexCollision {
            table: TableKind::Csr,
            name: "dma".to_owned(),
            index: 17,
            holder: "ddrphy".to_owned(),
        }
    );
}

#[test]
fn collision_against_base_entry_is_fatal() {
    let mut builder = RegistryBuilder::with_base();
    // Slot 8 is held by the inherited "sdram" entry.
    let err = builder.csr("rogue", 8).unwrap_err();
    assert!(matches!(err, ConfigError::IndexCollision { index: 8, .. }));
}

#[test]
fn same_name_reregistration_takes_precedence() {
    // A derived entry may shadow an inherited one under the same name.
    let mut builder = RegistryBuilder::with_base();
    builder.csr("uart", 20).unwrap();
    let registry = builder.build();
    assert_eq!(registry.csr_index("uart").unwrap(), 20);
    // Its old slot is free again.
    let mut builder = RegistryBuilder::with_base();
    builder.csr("uart", 20).unwrap();
    builder.csr("newcomer", 2).unwrap();
    assert_eq!(builder.build().csr_index("newcomer").unwrap(), 2);
}

#[test]
fn tables_use_independent_index_spaces() {
    let mut builder = RegistryBuilder::new();
    builder.csr("dma", 5).unwrap();
    // The same index in the interrupt table is not a collision.
    builder.interrupt("dma", 5).unwrap();
    let registry = builder.build();
    assert_eq!(registry.csr_index("dma").unwrap(), 5);
    assert_eq!(registry.interrupt_index("dma").unwrap(), 5);
}

#[test]
fn interrupt_collision_detected() {
    let mut builder = RegistryBuilder::new();
    builder.interrupt("dma_writer", 0).unwrap();
    let err = builder.interrupt("dma_reader", 0).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::IndexCollision {
            table: TableKind::Interrupt,
            ..
        }
    ));
}

// ══════════════════════════════════════════════════════════
// 3. Frozen lookups
// ══════════════════════════════════════════════════════════

#[test]
fn pairwise_distinct_indices_in_each_table() {
    let mut builder = RegistryBuilder::with_base();
    builder.csr("ddrphy", 17).unwrap();
    builder.csr("dma", 21).unwrap();
    builder.interrupt("dma_writer", 0).unwrap();
    builder.interrupt("dma_reader", 1).unwrap();
    let registry = builder.build();

    let entries: Vec<(&str, usize)> = registry.csr_entries().collect();
    for (a_name, a_index) in &entries {
        for (b_name, b_index) in &entries {
            if a_name != b_name {
                assert_ne!(a_index, b_index, "{a_name} and {b_name} share a slot");
            }
        }
    }
    let irqs: Vec<(&str, usize)> = registry.interrupt_entries().collect();
    for (a_name, a_index) in &irqs {
        for (b_name, b_index) in &irqs {
            if a_name != b_name {
                assert_ne!(a_index, b_index, "{a_name} and {b_name} share a vector");
            }
        }
    }
}

#[test]
fn unknown_name_lookup_fails() {
    let registry = RegistryBuilder::with_base().build();
    assert!(matches!(
        registry.csr_index("nonexistent"),
        Err(ConfigError::UnknownResource {
            table: TableKind::Csr,
            ..
        })
    ));
    assert!(matches!(
        registry.interrupt_index("nonexistent"),
        Err(ConfigError::UnknownResource {
            table: TableKind::Interrupt,
            ..
        })
    ));
}

#[test]
fn interrupt_count_is_highest_vector_plus_one() {
    let mut builder = RegistryBuilder::new();
    builder.interrupt("a", 0).unwrap();
    builder.interrupt("b", 6).unwrap();
    assert_eq!(builder.build().interrupt_count(), 7);
    assert_eq!(RegistryBuilder::new().build().interrupt_count(), 0);
}
