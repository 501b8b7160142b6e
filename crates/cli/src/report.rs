use fga_core::driver::RunStats;

pub fn render_stats(stats: &RunStats) -> anyhow::Result<String> {
    Ok(format!(
        "\nOperation stats:\n{}",
        storage::to_pretty_string(stats)?
    ))
}
