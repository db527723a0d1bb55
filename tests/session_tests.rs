use datadeck::session::{
    CredentialStore, FileCredentialStore, SessionContext, SessionEvent, TOKEN_KEY,
};

#[test]
fn file_store_roundtrips_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");

    {
        let mut store = FileCredentialStore::open(path.clone()).unwrap();
        store.set(TOKEN_KEY, "abc123").unwrap();
    }

    let store = FileCredentialStore::open(path).unwrap();
    assert_eq!(store.get(TOKEN_KEY), Some("abc123".to_string()));
}

#[test]
fn file_store_clear_all_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");

    {
        let mut store = FileCredentialStore::open(path.clone()).unwrap();
        store.set(TOKEN_KEY, "abc").unwrap();
        store.set("other", "value").unwrap();
        store.clear_all().unwrap();
    }

    let store = FileCredentialStore::open(path).unwrap();
    assert_eq!(store.get(TOKEN_KEY), None);
    assert_eq!(store.get("other"), None);
}

#[test]
fn login_over_file_store_replaces_prior_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");

    {
        let mut store = FileCredentialStore::open(path.clone()).unwrap();
        store.set("legacy", "leftover").unwrap();
        store.set(TOKEN_KEY, "expired").unwrap();
    }

    let store = FileCredentialStore::open(path.clone()).unwrap();
    let mut session = SessionContext::new(Box::new(store));
    assert!(session.is_logged_in());

    session
        .apply(SessionEvent::CredentialsSet {
            token: "fresh".to_string(),
        })
        .unwrap();

    // the old values are gone from disk, only the new token remains
    let reopened = FileCredentialStore::open(path).unwrap();
    assert_eq!(reopened.get(TOKEN_KEY), Some("fresh".to_string()));
    assert_eq!(reopened.get("legacy"), None);
}

#[test]
fn logout_leaves_a_logged_out_store_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");

    {
        let mut store = FileCredentialStore::open(path.clone()).unwrap();
        store.set(TOKEN_KEY, "abc").unwrap();
    }

    let mut session =
        SessionContext::new(Box::new(FileCredentialStore::open(path.clone()).unwrap()));
    session.apply(SessionEvent::LoggedOut).unwrap();

    let session = SessionContext::new(Box::new(FileCredentialStore::open(path).unwrap()));
    assert!(!session.is_logged_in());
}
