use pricer_core::{Card, CardEntry, SearchSettings, SettingsError, SourceId};
use pretty_assertions::assert_eq;

fn settings_with(names: &[(&str, u32)]) -> SearchSettings {
    let mut settings = SearchSettings::new();
    for (name, quantity) in names {
        settings.add_card(Card::new(name), *quantity).unwrap();
    }
    settings
}

fn names(settings: &SearchSettings) -> Vec<&str> {
    settings.cards().iter().map(Card::name).collect()
}

#[test]
fn cards_keep_insertion_order() {
    let settings = settings_with(&[("Mountain", 4), ("Island", 2), ("Forest", 1)]);
    assert_eq!(names(&settings), vec!["Mountain", "Island", "Forest"]);
    assert_eq!(settings.quantity(&Card::new("Island")), Some(2));
}

#[test]
fn adding_duplicate_card_is_rejected() {
    let mut settings = settings_with(&[("Mountain", 4)]);
    let err = settings
        .add_card(Card::new("  Mountain "), 1)
        .unwrap_err();
    assert_eq!(err, SettingsError::DuplicateCard(Card::new("Mountain")));
    assert_eq!(settings.card_count(), 1);
    assert_eq!(settings.quantity(&Card::new("Mountain")), Some(4));
}

#[test]
fn zero_quantity_is_rejected() {
    let mut settings = SearchSettings::new();
    let err = settings.add_card(Card::new("Mountain"), 0).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidQuantity { quantity: 0, .. }));
    assert_eq!(settings.card_count(), 0);

    let mut settings = settings_with(&[("Mountain", 3)]);
    let err = settings
        .set_quantity(&Card::new("Mountain"), 0)
        .unwrap_err();
    assert!(matches!(err, SettingsError::InvalidQuantity { .. }));
    assert_eq!(settings.quantity(&Card::new("Mountain")), Some(3));
}

#[test]
fn empty_card_name_is_rejected() {
    let mut settings = SearchSettings::new();
    assert_eq!(
        settings.add_card(Card::new("   "), 1),
        Err(SettingsError::EmptyCardName)
    );
}

#[test]
fn removing_absent_card_is_reported() {
    let mut settings = settings_with(&[("Mountain", 1)]);
    assert_eq!(
        settings.remove_card(&Card::new("Island")),
        Err(SettingsError::UnknownCard(Card::new("Island")))
    );
    settings.remove_card(&Card::new("Mountain")).unwrap();
    assert_eq!(settings.card_count(), 0);
    assert_eq!(settings.quantity(&Card::new("Mountain")), None);
}

#[test]
fn replace_card_preserves_position_and_quantity() {
    let mut settings = settings_with(&[("Mountain", 4), ("Island", 2), ("Forest", 1)]);
    settings
        .replace_card(&Card::new("Island"), Card::new("Swamp"))
        .unwrap();

    assert_eq!(names(&settings), vec!["Mountain", "Swamp", "Forest"]);
    assert_eq!(settings.quantity(&Card::new("Swamp")), Some(2));
    assert_eq!(settings.quantity(&Card::new("Island")), None);
}

#[test]
fn replace_card_rejects_existing_target() {
    let mut settings = settings_with(&[("Mountain", 4), ("Island", 2)]);
    let err = settings
        .replace_card(&Card::new("Island"), Card::new("Mountain"))
        .unwrap_err();
    assert_eq!(err, SettingsError::DuplicateCard(Card::new("Mountain")));
    assert_eq!(names(&settings), vec!["Mountain", "Island"]);
}

#[test]
fn sources_are_unique() {
    let mut settings = SearchSettings::new();
    let draco = SourceId::new("Draco", "http://shop.dragonhost.eu/");
    settings.add_source(draco.clone()).unwrap();
    assert_eq!(
        settings.add_source(draco.clone()),
        Err(SettingsError::DuplicateSource(draco.clone()))
    );

    // Same name on another host is a different source.
    let mirror = SourceId::new("Draco", "http://mirror.example/");
    settings.add_source(mirror.clone()).unwrap();
    assert_eq!(settings.sources(), &[draco.clone(), mirror]);

    settings.remove_source(&draco).unwrap();
    assert_eq!(
        settings.remove_source(&draco),
        Err(SettingsError::UnknownSource(draco))
    );
}

#[test]
fn entries_round_trip_through_settings() {
    let entries = vec![
        CardEntry::new(Card::new("Mountain"), 4),
        CardEntry::new(Card::new("Fire // Ice"), 2),
    ];
    let settings = SearchSettings::from_entries(entries.clone()).unwrap();
    assert_eq!(settings.entries(), entries);
}
