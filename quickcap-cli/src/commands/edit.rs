use anyhow::Result;
use quickcap_core::Form;
use quickcap_core::config::QuickcapConfig;

use super::{load, resolve, save, today};
use crate::fields::FieldArgs;

pub async fn run(
    config: &QuickcapConfig,
    reference: &str,
    text: Option<&str>,
    fields: &FieldArgs,
) -> Result<()> {
    let store = config.store()?;
    let snapshot = load(store.as_ref()).await?;
    let mut form = Form::edit(resolve(&snapshot, reference)?.clone());

    if let Some(text) = text {
        form.quick_entry(text, today());
    }
    fields.apply(&mut form)?;

    save(config, form, "Updated").await
}
