use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Run `fut` behind a spinner unless the store is the local file.
pub async fn with_spinner<T>(
    message: impl Into<String>,
    remote: bool,
    fut: impl std::future::Future<Output = T>,
) -> T {
    if !remote {
        return fut.await;
    }
    let spinner = create_spinner(message.into());
    let result = fut.await;
    spinner.finish_and_clear();
    result
}
