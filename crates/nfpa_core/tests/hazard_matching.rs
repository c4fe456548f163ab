use nfpa_core::{
    matches, ChemicalRecord, HazardCategory, HazardProfile, JsonStrLoader, ProfileError,
    SingleSourceIndex, SpecialSymbol, SpecialSymbols,
};

fn all_special_sets() -> Vec<SpecialSymbols> {
    let mut sets = Vec::new();
    for mask in 0u8..8 {
        let present = SpecialSymbol::ALL
            .into_iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, symbol)| symbol);
        sets.push(SpecialSymbols::from_present(present));
    }
    sets
}

fn sample_profiles() -> Vec<HazardProfile> {
    let specials = all_special_sets();
    let mut profiles = Vec::new();
    for (h, f, r) in [(0, 0, 0), (1, 3, 0), (1, 3, 1), (3, 0, 2), (4, 4, 4)] {
        for set in &specials {
            profiles.push(HazardProfile::new(h, f, r).unwrap().with_specials(*set));
        }
    }
    profiles
}

#[test]
fn ratings_only_match_ignores_specials() {
    let profiles = sample_profiles();
    for a in &profiles {
        for b in &profiles {
            let ratings_equal = a.health == b.health
                && a.flammability == b.flammability
                && a.reactivity == b.reactivity;
            assert_eq!(matches(a, b, false), ratings_equal, "{a} vs {b}");
        }
    }
}

#[test]
fn specials_match_implies_ratings_match() {
    let profiles = sample_profiles();
    for a in &profiles {
        for b in &profiles {
            if matches(a, b, true) {
                assert!(matches(a, b, false), "{a} vs {b}");
                assert_eq!(a.specials, b.specials);
            }
        }
    }
}

#[test]
fn oxidizer_query_does_not_match_non_oxidizer_record() {
    let stored = ChemicalRecord::new(
        "Calcium hypochlorite lookalike",
        HazardProfile::new(3, 0, 1)
            .unwrap()
            .with_special(SpecialSymbol::Oxidizer, false),
    );
    let index = SingleSourceIndex::from_records("set", vec![stored]);
    let query = HazardProfile::from_parts(
        Some(3),
        Some(0),
        Some(1),
        SpecialSymbols::from_present([SpecialSymbol::Oxidizer]),
    )
    .unwrap();

    assert!(index.query(&query, true).is_empty());
    assert_eq!(index.query(&query, false).len(), 1);
}

#[test]
fn query_for_absent_profile_is_empty() {
    let loader = JsonStrLoader::new(
        "set",
        r#"[{"NAME":"Acetone","HEALTH":1,"FLAMMABILITY":3,"REACTIVITY":0,"SPECIAL":""}]"#,
    );
    let index = SingleSourceIndex::load(&loader);
    assert_eq!(index.len(), 1);
    assert!(index
        .query(&HazardProfile::new(4, 4, 4).unwrap(), false)
        .is_empty());
}

#[test]
fn incomplete_query_input_is_rejected() {
    let err =
        HazardProfile::from_parts(None, Some(3), Some(0), SpecialSymbols::none()).unwrap_err();
    assert_eq!(err, ProfileError::MissingRating(HazardCategory::Health));

    let err =
        HazardProfile::from_parts(Some(1), Some(3), None, SpecialSymbols::none()).unwrap_err();
    assert_eq!(err, ProfileError::MissingRating(HazardCategory::Reactivity));
}

#[test]
fn profile_serialization_uses_plain_ratings() {
    let profile = HazardProfile::new(1, 3, 0)
        .unwrap()
        .with_special(SpecialSymbol::WaterReactive, true);
    let json = serde_json::to_value(profile).unwrap();
    assert_eq!(json["health"], 1);
    assert_eq!(json["flammability"], 3);
    assert_eq!(json["specials"]["water_reactive"], true);
    assert_eq!(json["specials"]["oxidizer"], false);

    let decoded: HazardProfile = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, profile);

    let out_of_range = serde_json::json!({"health": 9, "flammability": 0, "reactivity": 0});
    assert!(serde_json::from_value::<HazardProfile>(out_of_range).is_err());
}
