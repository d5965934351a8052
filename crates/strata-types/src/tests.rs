//! Unit tests for strata-types

use crate::{
    CatalogError, ColumnFamilyDescriptor, ConsistencyLevel, FamilyKind, FamilyName,
    KeyspaceMetadata, KeyspaceName, NameError, ReplicationFactor, SchemaCatalog,
};

// ============================================================================
// Name Tests
// ============================================================================

#[test]
fn keyspace_name_accepts_word_characters() {
    let name = KeyspaceName::new("social_prod_01").unwrap();
    assert_eq!(name.as_str(), "social_prod_01");
}

#[test]
fn keyspace_name_rejects_empty() {
    assert_eq!(KeyspaceName::new(""), Err(NameError::Empty));
}

#[test]
fn family_name_rejects_punctuation() {
    let err = FamilyName::new("user-tags").unwrap_err();
    assert_eq!(
        err,
        NameError::InvalidCharacter {
            name: "user-tags".to_string(),
            found: '-',
        }
    );
}

#[test]
fn family_name_rejects_overlong() {
    let long = "f".repeat(49);
    assert!(matches!(FamilyName::new(long), Err(NameError::TooLong(_))));
}

#[test]
fn family_name_display_is_raw() {
    let name = FamilyName::new("timeline").unwrap();
    assert_eq!(name.to_string(), "timeline");
}

// ============================================================================
// ReplicationFactor Tests
// ============================================================================

#[test]
fn replication_factor_parses_positive_integer() {
    let (factor, fell_back) = ReplicationFactor::parse_lossy("3");
    assert_eq!(factor.get(), 3);
    assert!(!fell_back);
}

#[test]
fn replication_factor_parses_with_whitespace() {
    let (factor, fell_back) = ReplicationFactor::parse_lossy(" 5 ");
    assert_eq!(factor.get(), 5);
    assert!(!fell_back);
}

#[test]
fn replication_factor_falls_back_on_garbage() {
    for input in ["abc", "", "-1", "0", "3.5", "999999999999999999999"] {
        let (factor, fell_back) = ReplicationFactor::parse_lossy(input);
        assert_eq!(factor, ReplicationFactor::DEFAULT, "input: {input:?}");
        assert!(fell_back, "input: {input:?}");
    }
}

#[test]
fn replication_factor_default_is_one() {
    assert_eq!(ReplicationFactor::default().get(), 1);
}

// ============================================================================
// ConsistencyLevel Tests
// ============================================================================

#[test]
fn consistency_defaults_to_one() {
    assert_eq!(ConsistencyLevel::default(), ConsistencyLevel::One);
}

#[test]
fn consistency_display() {
    assert_eq!(ConsistencyLevel::One.to_string(), "one");
    assert_eq!(ConsistencyLevel::Quorum.to_string(), "quorum");
}

// ============================================================================
// Descriptor Tests
// ============================================================================

#[test]
fn descriptor_row_cache_defaults_to_zero() {
    let descriptor =
        ColumnFamilyDescriptor::new(FamilyName::new("users").unwrap(), FamilyKind::Plain);
    assert_eq!(descriptor.row_cache_keys, 0);
}

#[test]
fn descriptor_row_cache_override() {
    let descriptor =
        ColumnFamilyDescriptor::new(FamilyName::new("users").unwrap(), FamilyKind::Plain)
            .with_row_cache_keys(100);
    assert_eq!(descriptor.row_cache_keys, 100);
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[test]
fn catalog_groups_by_kind_in_declaration_order() {
    // Interleave declarations; the built catalog still emits plain,
    // then time-ordered, then counter.
    let catalog = SchemaCatalog::builder()
        .counter("follower_count")
        .plain("users")
        .time_ordered("timeline")
        .plain("groups")
        .build()
        .unwrap();

    let order: Vec<(&str, FamilyKind)> = catalog
        .iter()
        .map(|f| (f.name.as_str(), f.kind))
        .collect();
    assert_eq!(
        order,
        vec![
            ("users", FamilyKind::Plain),
            ("groups", FamilyKind::Plain),
            ("timeline", FamilyKind::TimeOrdered),
            ("follower_count", FamilyKind::Counter),
        ]
    );
}

#[test]
fn catalog_rejects_duplicate_names() {
    let err = SchemaCatalog::builder()
        .plain("users")
        .time_ordered("users")
        .build()
        .unwrap_err();
    assert_eq!(err, CatalogError::Duplicate("users".to_string()));
}

#[test]
fn catalog_rejects_invalid_names() {
    let err = SchemaCatalog::builder().plain("no spaces").build().unwrap_err();
    assert!(matches!(err, CatalogError::Name(_)));
}

#[test]
fn catalog_counts_by_kind() {
    let catalog = SchemaCatalog::builder()
        .plain("users")
        .plain("groups")
        .time_ordered("timeline")
        .counter("day_counters")
        .build()
        .unwrap();
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.count_of(FamilyKind::Plain), 2);
    assert_eq!(catalog.count_of(FamilyKind::TimeOrdered), 1);
    assert_eq!(catalog.count_of(FamilyKind::Counter), 1);
}

// ============================================================================
// Metadata Tests
// ============================================================================

#[test]
fn metadata_family_lookup() {
    let metadata = KeyspaceMetadata {
        name: KeyspaceName::new("app").unwrap(),
        replication_factor: ReplicationFactor::new(3),
        families: vec![FamilyName::new("users").unwrap()],
    };
    assert!(metadata.contains_family(&FamilyName::new("users").unwrap()));
    assert!(!metadata.contains_family(&FamilyName::new("timeline").unwrap()));
}
