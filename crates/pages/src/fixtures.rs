use std::sync::Arc;
use std::time::Duration;

use bistro_client::testing::ScriptedBackend;
use bistro_schema::{FieldValue, parse_date};
use chrono::{DateTime, Utc};
use tokio::time::{sleep, timeout};

use crate::context::PageContext;
use crate::route::History;

pub(crate) fn oct_16() -> DateTime<Utc> {
	parse_date("2026-10-16").expect("valid date")
}

pub(crate) fn oct_16_value() -> FieldValue {
	FieldValue::Date(oct_16())
}

pub(crate) fn context(backend: &Arc<ScriptedBackend>) -> (PageContext, Arc<History>) {
	let history = Arc::new(History::new());
	let ctx = PageContext::new(backend.clone(), history.clone());
	(ctx, history)
}

pub(crate) async fn wait_until<F>(name: &str, mut condition: F)
where
	F: FnMut() -> bool,
{
	timeout(Duration::from_secs(2), async move {
		loop {
			if condition() {
				return;
			}
			sleep(Duration::from_millis(10)).await;
		}
	})
	.await
	.unwrap_or_else(|_| panic!("timed out waiting for {name}"));
}
