mod support;

use marquee_config::DisplayConfig;
use marquee_core::model::{Availability, CatalogKind, EntityId};
use marquee_core::{ApiError, ContentState, RouteOutcome};
use support::{config_with_display, engine, groups, movie, seeded_stub, series};

fn names(entities: &[marquee_core::model::CatalogEntity]) -> Vec<&str> {
    entities.iter().map(|entity| entity.name.as_str()).collect()
}

#[tokio::test]
async fn network_detail_fetches_and_binds_content() {
    let stub = seeded_stub();
    stub.set_content(
        CatalogKind::Networks,
        EntityId::from(7),
        groups(
            vec![movie(1, "Mad Men: The Movie", Availability::Available)],
            vec![
                series(1104, "Mad Men", Availability::NotAvailable),
                series(1396, "Breaking Bad", Availability::Requested),
            ],
        ),
    );
    let engine = engine(&stub, support::config());
    engine.refresh().await;

    let RouteOutcome::Detail(view) = engine.navigate("/network/7").await else {
        panic!("expected a detail view");
    };
    assert_eq!(view.kind, CatalogKind::Networks);
    assert_eq!(view.entity.name, "AMC");
    let ContentState::Loaded { movies, series } = &view.content else {
        panic!("expected loaded content");
    };
    assert_eq!(movies.len(), 1);
    assert_eq!(series.len(), 2);
    assert!(!movies[0].shows_request_affordance());
    assert!(series[0].shows_request_affordance());
    assert!(!series[1].shows_request_affordance());
    assert_eq!(stub.calls().content, 1);
}

#[tokio::test]
async fn hash_routes_resolve_like_plain_paths() {
    let stub = seeded_stub();
    let engine = engine(&stub, support::config());
    engine.refresh().await;

    let RouteOutcome::Detail(view) = engine.navigate("#/studio/41?tab=movies").await
    else {
        panic!("expected a detail view");
    };
    assert_eq!(view.entity.name, "A24");
    assert!(view.content.cards().next().is_none());
}

#[tokio::test]
async fn unknown_entity_is_not_found_without_fetching() {
    let stub = seeded_stub();
    let engine = engine(&stub, support::config());
    engine.refresh().await;

    let outcome = engine.navigate("/network/999").await;
    assert!(matches!(
        outcome,
        RouteOutcome::NotFound { kind: CatalogKind::Networks, ref id }
            if *id == EntityId::from(999)
    ));
    // Studio ids are not network ids.
    assert!(matches!(
        engine.navigate("/network/41").await,
        RouteOutcome::NotFound { .. }
    ));
    assert_eq!(stub.calls().content, 0);
}

#[tokio::test]
async fn detail_before_first_refresh_is_not_found() {
    let stub = seeded_stub();
    let engine = engine(&stub, support::config());

    assert!(matches!(
        engine.navigate("/network/1").await,
        RouteOutcome::NotFound { .. }
    ));
    assert_eq!(stub.calls().content, 0);
}

#[tokio::test]
async fn failed_content_fetch_degrades_the_view() {
    let stub = seeded_stub();
    stub.fail_content(
        CatalogKind::Networks,
        EntityId::from(2),
        ApiError::Transport("connection refused".into()),
    );
    let engine = engine(&stub, support::config());
    engine.refresh().await;

    let RouteOutcome::Detail(view) = engine.navigate("/network/2").await else {
        panic!("expected a detail view");
    };
    assert_eq!(view.entity.name, "Netflix");
    assert!(view.content.is_failed());
    let ContentState::Failed { message } = &view.content else {
        unreachable!();
    };
    assert!(message.contains("connection refused"));
}

#[tokio::test]
async fn home_shows_configured_entities_in_order() {
    let stub = seeded_stub();
    let engine = engine(
        &stub,
        config_with_display(&["Netflix", "Peacock", "hbo"], &["Pixar"]),
    );
    engine.refresh().await;

    let RouteOutcome::Home(listing) = engine.navigate("/").await else {
        panic!("expected home");
    };
    assert_eq!(names(&listing.networks), vec!["Netflix", "HBO"]);
    assert_eq!(names(&listing.studios), vec!["Pixar"]);
}

#[tokio::test]
async fn home_selection_uses_display_names() {
    let stub = seeded_stub();
    stub.set_catalog(
        CatalogKind::Networks,
        support::entities(&[(1, "HBO"), (2, "Netflix")]),
    );
    let engine = engine(&stub, config_with_display(&["HBO"], &[]));
    engine.refresh().await;

    let RouteOutcome::Home(listing) = engine.navigate("#/home").await else {
        panic!("expected home");
    };
    assert_eq!(listing.networks.len(), 1);
    assert_eq!(listing.networks[0].id, EntityId::from(1));
    assert!(listing.studios.is_empty());
}

#[tokio::test]
async fn display_changes_apply_without_a_refresh() {
    let stub = seeded_stub();
    let engine = engine(&stub, config_with_display(&["HBO"], &[]));
    engine.refresh().await;

    engine.router().set_display(DisplayConfig {
        networks: vec!["AMC".into()],
        studios: vec!["A24".into()],
    });
    let listing = engine.router().home();
    assert_eq!(names(&listing.networks), vec!["AMC"]);
    assert_eq!(names(&listing.studios), vec!["A24"]);
    assert_eq!(stub.calls().networks, 1);
}

#[tokio::test]
async fn browse_lists_every_entity_by_name() {
    let stub = seeded_stub();
    let engine = engine(&stub, support::config());
    engine.refresh().await;

    let RouteOutcome::BrowseAll(listing) = engine.navigate("/browse").await else {
        panic!("expected browse all");
    };
    assert_eq!(names(&listing.networks), vec!["AMC", "HBO", "Netflix"]);
    assert_eq!(names(&listing.studios), vec!["A24", "Pixar"]);
}

#[tokio::test]
async fn unrecognized_paths_leave_the_view_unchanged() {
    let stub = seeded_stub();
    let engine = engine(&stub, support::config());

    for path in ["/settings", "/network/", "/library/12"] {
        assert!(matches!(
            engine.navigate(path).await,
            RouteOutcome::Unchanged
        ));
    }
    assert_eq!(stub.calls().content, 0);
}

#[tokio::test]
async fn refetch_does_not_rewrite_shown_cards() {
    let stub = seeded_stub();
    let id = EntityId::from(1);
    stub.set_content(
        CatalogKind::Networks,
        id.clone(),
        groups(vec![movie(10, "Heat", Availability::NotAvailable)], vec![]),
    );
    let engine = engine(&stub, support::config());
    engine.refresh().await;

    let RouteOutcome::Detail(first) = engine.navigate("/network/1").await else {
        panic!("expected a detail view");
    };
    let mut transitions = engine.store().subscribe_transitions();

    stub.set_content(
        CatalogKind::Networks,
        id,
        groups(vec![movie(10, "Heat", Availability::Available)], vec![]),
    );
    let RouteOutcome::Detail(second) = engine.navigate("/network/1").await else {
        panic!("expected a detail view");
    };

    let shown = first.content.cards().next().unwrap();
    let refetched = second.content.cards().next().unwrap();
    assert_eq!(shown.availability(), Availability::NotAvailable);
    assert_eq!(refetched.availability(), Availability::NotAvailable);
    assert!(transitions.try_recv().is_err());
    assert_eq!(stub.calls().content, 2);
}

#[tokio::test]
async fn reconcile_brings_shown_cards_up_to_date() {
    let stub = seeded_stub();
    let heat = movie(10, "Heat", Availability::NotAvailable);
    stub.set_content(
        CatalogKind::Networks,
        EntityId::from(1),
        groups(vec![heat.clone()], vec![]),
    );
    let engine = engine(&stub, support::config());
    engine.refresh().await;

    let RouteOutcome::Detail(view) = engine.navigate("/network/1").await else {
        panic!("expected a detail view");
    };
    stub.set_library_status(heat.key(), Availability::Available);
    assert_eq!(engine.reconcile(&heat).await.unwrap(), Availability::Available);

    let card = view.content.cards().next().unwrap();
    assert_eq!(card.availability(), Availability::Available);
    assert!(!card.shows_request_affordance());
}
