use anyhow::Result;
use quickcap_core::config::QuickcapConfig;
use quickcap_core::{Form, ItemType};

use super::{save, today};
use crate::fields::FieldArgs;

pub async fn run(config: &QuickcapConfig, text: &str, event: bool, fields: &FieldArgs) -> Result<()> {
    let item_type = if event { ItemType::Event } else { ItemType::Task };
    let mut form = Form::new(item_type, config.timezone.as_str());

    if !text.trim().is_empty() {
        form.quick_entry(text, today());
    }
    fields.apply(&mut form)?;

    save(config, form, "Created").await
}
