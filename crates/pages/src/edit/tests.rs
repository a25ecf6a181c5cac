use std::sync::Arc;

use bistro_client::ApiError;
use bistro_client::testing::{Call, GateKind, ScriptedBackend};
use bistro_forms::SubmitError;
use bistro_schema::{EntityType, FieldValue, Record};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::fixtures::{context, oct_16_value, wait_until};

fn admin() -> Record {
	Record::new("u1")
		.with("role", "admin")
		.with("created_at", oct_16_value())
		.with("updated_at", oct_16_value())
}

fn backend() -> Arc<ScriptedBackend> {
	Arc::new(ScriptedBackend::new().with_records(EntityType::Users, [admin()]))
}

#[tokio::test]
async fn loads_record_into_form() {
	let backend = backend();
	let (ctx, _) = context(&backend);

	let mut page = EditPage::mount(&ctx, EntityType::Users, "u1");
	assert!(page.state().is_loading());
	assert!(matches!(page.submit().await, Err(PageError::NotReady)));

	assert!(page.load().await);
	let Loadable::Ready(view) = page.view() else {
		panic!("record loads");
	};
	assert_eq!(view.field("role").map(|field| field.value.as_str()), Some("admin"));
	assert_eq!(view.field("created_at").map(|field| field.value.as_str()), Some("2026-10-16"));
	assert_eq!(ctx.cache.record(EntityType::Users, "u1"), Some(admin()));
}

#[tokio::test]
async fn clearing_required_role_blocks_put() {
	let backend = backend();
	let (ctx, history) = context(&backend);
	let mut page = EditPage::mount(&ctx, EntityType::Users, "u1");
	page.load().await;

	let form = page.form_mut().expect("form is ready");
	form.set_input("role", "").expect("text input");
	assert!(!form.controller().is_valid());

	let result = page.submit().await;
	assert!(matches!(result, Err(PageError::Submit(SubmitError::Invalid(_)))));
	assert_eq!(backend.mutation_count(), 0);
	assert_eq!(history.current(), None);
}

#[tokio::test]
async fn successful_update_replaces_cached_record_and_navigates() {
	let backend = backend();
	let (ctx, history) = context(&backend);
	ctx.cache.put_list(EntityType::Users, vec![admin()]);

	let mut page = EditPage::mount(&ctx, EntityType::Users, "u1");
	page.load().await;
	page.form_mut().expect("form is ready").set_input("role", "owner").expect("text input");

	let updated = page.submit().await.expect("update succeeds").expect("page still mounted");
	assert_eq!(updated.get("role"), Some(FieldValue::text("owner")));

	let calls = backend.calls();
	assert_eq!(
		calls.last(),
		Some(&Call::Update {
			entity: EntityType::Users,
			id: "u1".into(),
			body: json!({
				"role": "owner",
				"created_at": "2026-10-16T00:00:00.000Z",
				"updated_at": "2026-10-16T00:00:00.000Z",
			}),
		})
	);
	assert_eq!(
		calls.iter().filter(|call| matches!(call, Call::Get { .. })).count(),
		1,
		"no refetch after update"
	);
	assert_eq!(ctx.cache.record(EntityType::Users, "u1"), Some(updated));
	assert!(ctx.cache.list(EntityType::Users).is_none());
	assert_eq!(history.current(), Some(Route::List(EntityType::Users)));
}

#[tokio::test]
async fn not_found_blocks_the_form() {
	let backend = backend();
	let (ctx, _) = context(&backend);

	let mut page = EditPage::mount(&ctx, EntityType::Users, "missing");
	page.load().await;

	let Loadable::Failed(error) = page.view() else {
		panic!("missing record fails the page");
	};
	assert!(error.is_not_found());
	assert!(matches!(page.form_mut(), Err(PageError::NotReady)));
	assert!(matches!(page.submit().await, Err(PageError::NotReady)));
}

#[tokio::test]
async fn cached_record_renders_and_fresh_fetch_reinitializes() {
	let backend = backend();
	let (ctx, _) = context(&backend);
	ctx.cache.put_record(EntityType::Users, Record::new("u1").with("role", "stale"));

	let mut page = EditPage::mount(&ctx, EntityType::Users, "u1");
	let form = page.form_mut().expect("cached record gives a form");
	assert_eq!(form.values().get("role"), Some(&FieldValue::text("stale")));
	form.set_input("role", "typing").expect("text input");

	page.load().await;
	let form = page.form_mut().expect("form is ready");
	assert_eq!(form.values().get("role"), Some(&FieldValue::text("admin")));
	assert!(!form.controller().is_dirty());
}

#[tokio::test]
async fn network_failure_on_load_is_reported() {
	let backend = backend();
	backend.fail_next_get(ApiError::Network("unreachable".into()));
	let (ctx, _) = context(&backend);

	let mut page = EditPage::mount(&ctx, EntityType::Users, "u1");
	page.load().await;
	assert_eq!(page.state().error(), Some(&ApiError::Network("unreachable".into())));
}

#[tokio::test]
async fn failed_reload_keeps_edits_and_shows_banner() {
	let backend = backend();
	let (ctx, _) = context(&backend);
	let mut page = EditPage::mount(&ctx, EntityType::Users, "u1");
	page.load().await;
	page.form_mut().expect("form is ready").set_input("role", "owner").expect("text input");

	backend.fail_next_get(ApiError::Network("unreachable".into()));
	assert!(page.load().await);

	let Loadable::Ready(view) = page.view() else {
		panic!("form survives a failed reload");
	};
	assert_eq!(view.field("role").map(|field| field.value.as_str()), Some("owner"));
	assert!(view.banner.is_some_and(|banner| banner.contains("unreachable")));

	page.load().await;
	let Loadable::Ready(view) = page.view() else {
		panic!("record reloads");
	};
	assert_eq!(view.banner, None);
	assert_eq!(view.field("role").map(|field| field.value.as_str()), Some("admin"));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn unmount_during_load_discards_record() {
	let backend = backend();
	let gate = backend.gate(GateKind::Get, EntityType::Users);
	let (ctx, _) = context(&backend);

	let mut page = EditPage::mount(&ctx, EntityType::Users, "u1");
	let scope = page.scope();
	let task = tokio::spawn(async move {
		let applied = page.load().await;
		(applied, page)
	});
	wait_until("record requested", || backend.calls().len() == 1).await;

	scope.unmount();
	gate.open();
	let (applied, page) = task.await.expect("load task");

	assert!(!applied);
	assert!(page.state().is_loading());
	assert!(ctx.cache.record(EntityType::Users, "u1").is_none());
}
