use jordan_wells::{
    selection::{resolve_selection, UrlState, GOV_KEY},
    view, Governorate,
};

fn url_with_gov(value: &str) -> UrlState {
    [(GOV_KEY, value)].into_iter().collect()
}

#[test]
fn missing_key_resolves_to_amman_and_is_written_back() {
    let mut url_state = UrlState::new();
    let selection = resolve_selection(&mut url_state);

    assert_eq!(selection, Governorate::Amman);
    assert_eq!(url_state.get(GOV_KEY), Some("Amman"));
    assert_eq!(url_state.to_query_string().unwrap(), "gov=Amman");
}

#[test]
fn irbid_is_honored_with_its_sidebar_facts() {
    let mut url_state = url_with_gov("Irbid");
    let selection = resolve_selection(&mut url_state);

    assert_eq!(selection, Governorate::Irbid);
    let sidebar = view::sidebar(selection);
    assert_eq!(sidebar.population, 1_900_000);
    assert_eq!(sidebar.population_label, "1,900,000");
    assert_eq!(sidebar.elevation_m, 620);
}

#[test]
fn unknown_value_falls_back_without_touching_the_url() {
    let mut url_state = url_with_gov("Atlantis");
    let before = url_state.clone();

    assert_eq!(resolve_selection(&mut url_state), Governorate::Amman);
    assert_eq!(url_state, before);
    assert_eq!(url_state.get(GOV_KEY), Some("Atlantis"));
}

#[test]
fn invalid_values_never_trigger_write_back() {
    for raw in ["", "amman", "IRBID", "Ma'an", "Zarqa ", "Atlantis", "Amman,Irbid"] {
        let mut url_state = url_with_gov(raw);
        assert_eq!(resolve_selection(&mut url_state), Governorate::Amman, "{raw:?}");
        assert_eq!(url_state.get(GOV_KEY), Some(raw), "{raw:?}");
    }
}

#[test]
fn every_valid_name_is_returned_unchanged() {
    for gov in Governorate::ALL {
        let mut url_state = url_with_gov(gov.name());
        assert_eq!(resolve_selection(&mut url_state), gov);
        assert_eq!(url_state.get(GOV_KEY), Some(gov.name()));
    }
}
