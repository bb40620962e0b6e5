//! User directory against `PostgreSQL`.

use super::helpers::{TrackerDb, test_runtime};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskflow::user::domain::{AvatarUrl, DisplayName, Email, NewUser};
use taskflow::user::ports::{UserRepository, UserRepositoryError};

#[rstest]
fn email_is_unique_ignoring_case(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "usr_email", 2)?;
    rt.block_on(async {
        let original = db.user("Dana").await?;
        let twin = NewUser::new(
            Email::new("DANA@Example.Test")?,
            DisplayName::new("Other Dana")?,
            &DefaultClock,
        );
        let result = db.users.create(&twin).await;
        eyre::ensure!(
            matches!(result, Err(UserRepositoryError::DuplicateEmail(_))),
            "unexpected result {result:?}"
        );

        let found = db.users.find_by_email(&Email::new("Dana@EXAMPLE.test")?).await?;
        eyre::ensure!(
            found.map(|user| user.id()) == Some(original.id()),
            "lookup should ignore case"
        );
        Ok(())
    })
}

#[rstest]
fn profile_round_trips(shared_test_cluster: &'static TestCluster) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "usr_profile", 2)?;
    rt.block_on(async {
        let draft = NewUser::new(
            Email::new("admin@example.test")?,
            DisplayName::new("Admin")?,
            &DefaultClock,
        )
        .with_avatar_url(AvatarUrl::new("https://example.test/admin.png")?)
        .as_admin();
        let created = db.users.create(&draft).await?;
        let stored = db
            .users
            .find_by_id(created.id())
            .await?
            .ok_or_else(|| eyre::eyre!("user should be stored"))?;

        eyre::ensure!(stored.is_admin(), "admin flag should persist");
        eyre::ensure!(
            stored.avatar_url().map(AvatarUrl::as_str) == Some("https://example.test/admin.png"),
            "avatar should persist"
        );
        eyre::ensure!(stored.email().as_str() == "admin@example.test", "email changed");
        Ok(())
    })
}

#[rstest]
fn directory_lists_users_by_display_name(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "usr_list", 2)?;
    rt.block_on(async {
        for name in ["Morgan", "Alex", "Robin"] {
            db.user(name).await?;
        }
        let names: Vec<String> = db
            .users
            .list_all()
            .await?
            .iter()
            .map(|user| user.display_name().as_str().to_owned())
            .collect();
        eyre::ensure!(
            names == ["Alex", "Morgan", "Robin"],
            "unexpected order {names:?}"
        );
        Ok(())
    })
}
