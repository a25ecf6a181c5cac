use anyhow::{Context, bail};
use bistro_pages::{CreatePage, EditPage, EntityForm, History, ListPage, Loadable, PageContext, Route};
use bistro_schema::EntityType;

use crate::cli::Command;
use crate::render;

/// Runs one page command and returns what it renders.
pub async fn run(ctx: &PageContext, history: &History, command: Command) -> anyhow::Result<String> {
	match command {
		Command::Entities => Ok(render::entities()),
		Command::List { entity } => Ok(list(ctx, entity).await),
		Command::Show { entity, id } => {
			let mut page = EditPage::mount(ctx, entity, id);
			page.load().await;
			Ok(render::edit(&page.view()))
		}
		Command::Create { entity, fields } => {
			let mut page = CreatePage::mount(ctx, entity);
			fill(page.form_mut(), &fields)?;
			if let Err(error) = page.submit().await {
				bail!("{}\n{error}", render::form(&page.view()));
			}
			follow(ctx, history).await
		}
		Command::Edit { entity, id, fields } => {
			let mut page = EditPage::mount(ctx, entity, id);
			page.load().await;
			if let Loadable::Failed(error) = page.state() {
				bail!("{}", error);
			}
			fill(page.form_mut()?, &fields)?;
			if let Err(error) = page.submit().await {
				bail!("{}\n{error}", render::edit(&page.view()));
			}
			follow(ctx, history).await
		}
		Command::Options { entity, field, term } => {
			let page = CreatePage::mount(ctx, entity);
			page.form().query(&field, &term).await?;
			let selector = page.form().selector(&field).context("relation selector")?;
			if let Some(error) = selector.error() {
				bail!("{error}");
			}
			Ok(selector
				.options()
				.iter()
				.map(|option| format!("{}\t{}\n", option.id, option.label))
				.collect())
		}
	}
}

/// Applies `field=value` assignments; relation fields go through their selector.
fn fill(form: &mut EntityForm, fields: &[(String, String)]) -> anyhow::Result<()> {
	for (field, value) in fields {
		if form.selector(field).is_some() {
			form.select(field, value)?;
		} else {
			form.set_input(field, value)?;
		}
	}
	Ok(())
}

async fn list(ctx: &PageContext, entity: EntityType) -> String {
	let mut page = ListPage::mount(ctx, entity);
	page.load().await;
	render::list(entity.title(), &page.view())
}

/// Renders the page the last submit navigated to.
async fn follow(ctx: &PageContext, history: &History) -> anyhow::Result<String> {
	match history.current() {
		Some(Route::List(entity)) => Ok(list(ctx, entity).await),
		Some(Route::Create(entity)) => Ok(render::form(&CreatePage::mount(ctx, entity).view())),
		Some(Route::Edit(entity, id)) => {
			let mut page = EditPage::mount(ctx, entity, id);
			page.load().await;
			Ok(render::edit(&page.view()))
		}
		None => bail!("submit did not navigate"),
	}
}
