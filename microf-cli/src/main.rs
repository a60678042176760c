use crate::cmd::{App, Cmd};
use anyhow::Result;
use clap::Parser;
mod cmd;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	let app: App = App::parse();
	app.run().await
}
