//! Property-based tests for naming, secrets and derived configuration.

#![allow(clippy::expect_used)]

use std::path::Path;

use datacats_cli::domain::project::is_valid_name;
use datacats_cli::domain::secrets::{SECRET_ALPHABET, alphabet_symbol};
use datacats_cli::domain::{CredentialSet, Project, Secret, ValidationError, compute_assignments};
use proptest::prelude::*;

fn secret() -> impl Strategy<Value = Secret> {
    "[A-Za-z0-9]{16}".prop_map(Secret::new)
}

proptest! {
    /// Names matching the grammar resolve to a project with that name.
    #[test]
    fn prop_valid_names_resolve(name in "[a-z][a-z0-9]{0,30}") {
        prop_assert!(is_valid_name(&name));
        let project = Project::from_path(Path::new(&name), Path::new("/work"), Path::new("/home/u"))
            .expect("valid");
        prop_assert_eq!(project.name(), name.as_str());
        prop_assert_eq!(project.datadir(), Path::new("/home/u/.datacats").join(&name));
        prop_assert_eq!(project.target(), Path::new("/work").join(&name));
    }

    /// Any uppercase letter, leading digit or separator makes a name invalid.
    #[test]
    fn prop_invalid_names_rejected(name in "([0-9][a-z0-9]*|[a-z]*[A-Z_-][a-zA-Z0-9_-]*)") {
        let err = Project::from_path(Path::new(&name), Path::new("/work"), Path::new("/home/u"))
            .expect_err("invalid");
        prop_assert_eq!(err, ValidationError::InvalidName(name));
    }

    /// Accepted bytes always map into the alphabet; the top of the byte
    /// range is always discarded.
    #[test]
    fn prop_alphabet_symbol_is_in_alphabet(byte in any::<u8>()) {
        match alphabet_symbol(byte) {
            Some(c) => {
                prop_assert!(byte < 248);
                prop_assert!(SECRET_ALPHABET.contains(&u8::try_from(c).expect("ascii")));
            }
            None => prop_assert!(byte >= 248),
        }
    }

    /// Assignments embed every database secret exactly where expected and
    /// never embed the superuser password.
    #[test]
    fn prop_assignments_embed_secrets(
        postgres in secret(),
        ckan in secret(),
        datastore_ro in secret(),
        datastore_rw in secret(),
    ) {
        let set = CredentialSet { postgres, ckan, datastore_ro, datastore_rw };
        let assignments = compute_assignments(&set);
        let keys: Vec<_> = assignments.iter().map(|a| a.key).collect();
        prop_assert_eq!(keys, [
            "sqlalchemy.url",
            "ckan.datastore.read_url",
            "ckan.datastore.write_url",
            "solr_url",
            "ckan.storage_path",
        ]);
        prop_assert!(assignments[0].value.contains(set.ckan.expose()));
        prop_assert!(assignments[1].value.contains(set.datastore_ro.expose()));
        prop_assert!(assignments[2].value.contains(set.datastore_rw.expose()));
        if set.postgres != set.ckan && set.postgres != set.datastore_ro && set.postgres != set.datastore_rw {
            prop_assert!(!assignments.iter().any(|a| a.value.contains(set.postgres.expose())));
        }
        prop_assert_eq!(&assignments, &compute_assignments(&set));
    }
}
