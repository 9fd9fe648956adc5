#[tokio::main]
async fn main() -> anyhow::Result<()> {
    moodlog_lib::run().await
}
