use std::sync::Arc;

use bistro_client::ApiError;
use bistro_client::testing::{Call, GateKind, ScriptedBackend};
use bistro_schema::{EntityType, Record};
use pretty_assertions::assert_eq;

use super::*;
use crate::fixtures::{context, oct_16_value, wait_until};

fn restaurants() -> Vec<Record> {
	vec![
		Record::new("r1")
			.with("name", "Chez Nous")
			.with("description", "bistro")
			.with("created_at", oct_16_value())
			.with("updated_at", oct_16_value())
			.with("owner_id", "u1"),
	]
}

#[tokio::test]
async fn renders_one_row_per_record_with_id_column() {
	let backend = Arc::new(ScriptedBackend::new().with_records(EntityType::Restaurants, restaurants()));
	let (ctx, _) = context(&backend);

	let mut page = ListPage::mount(&ctx, EntityType::Restaurants);
	assert_eq!(page.view(), ListView::Loading);
	assert!(page.load().await);

	assert_eq!(
		page.view(),
		ListView::Table(Table {
			columns: vec!["id", "name", "description", "created_at", "updated_at", "owner_id"],
			rows: vec![vec![
				"r1".into(),
				"Chez Nous".into(),
				"bistro".into(),
				"Fri Oct 16 2026".into(),
				"Fri Oct 16 2026".into(),
				"u1".into(),
			]],
		})
	);
	assert_eq!(ctx.cache.list(EntityType::Restaurants).map(|list| list.len()), Some(1));
}

#[tokio::test]
async fn network_failure_shows_banner_and_no_table() {
	let backend = Arc::new(ScriptedBackend::new());
	backend.fail_list(EntityType::Restaurants, ApiError::Network("connection refused".into()));
	let (ctx, _) = context(&backend);

	let mut page = ListPage::mount(&ctx, EntityType::Restaurants);
	page.load().await;

	let ListView::Error(banner) = page.view() else {
		panic!("expected an error banner, got {:?}", page.view());
	};
	assert!(banner.contains("connection refused"));
	assert!(page.state().ready().is_none());
	assert_eq!(
		backend.calls(),
		[Call::List {
			entity: EntityType::Restaurants,
			search: None,
		}],
		"no automatic retry"
	);
}

#[tokio::test]
async fn cached_list_shows_before_revalidation() {
	let backend = Arc::new(ScriptedBackend::new().with_records(EntityType::Restaurants, restaurants()));
	let (ctx, _) = context(&backend);
	ctx.cache.put_list(EntityType::Restaurants, vec![Record::new("stale")]);

	let mut page = ListPage::mount(&ctx, EntityType::Restaurants);
	let ListView::Table(table) = page.view() else {
		panic!("cached list renders immediately");
	};
	assert_eq!(table.rows[0][0], "stale");

	page.load().await;
	let ListView::Table(table) = page.view() else {
		panic!("revalidated list renders");
	};
	assert_eq!(table.rows[0][0], "r1");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn results_after_unmount_are_discarded() {
	let backend = Arc::new(ScriptedBackend::new().with_records(EntityType::Restaurants, restaurants()));
	let gate = backend.gate(GateKind::List, EntityType::Restaurants);
	let (ctx, _) = context(&backend);

	let mut page = ListPage::mount(&ctx, EntityType::Restaurants);
	let scope = page.scope();
	let task = tokio::spawn(async move {
		let applied = page.load().await;
		(applied, page)
	});
	wait_until("list requested", || backend.calls().len() == 1).await;

	scope.unmount();
	gate.open();
	let (applied, page) = task.await.expect("load task");

	assert!(!applied);
	assert_eq!(page.view(), ListView::Loading);
	assert!(ctx.cache.list(EntityType::Restaurants).is_none());
}
