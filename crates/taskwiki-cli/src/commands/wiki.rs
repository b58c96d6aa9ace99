//! Wiki node commands.

use clap::Subcommand;
use taskwiki_core::Node;

use super::common;

#[derive(Subcommand)]
pub enum WikiAction {
    /// List wiki node IDs
    Ls,
    /// Show a node's file path
    Resolve {
        /// Node ID
        node: String,
        /// Do not fall back to the would-be path when the node is missing
        #[arg(long)]
        strict: bool,
    },
}

pub fn run(action: WikiAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, wiki) = common::open_wiki()?;

    match action {
        WikiAction::Ls => {
            for node in wiki.nodes() {
                println!("{}", node.id());
            }
        }
        WikiAction::Resolve { node, strict } => {
            match wiki.find_node_by_id(&node) {
                Some(found) => print!("{}", found.path().display()),
                None if !strict => {
                    print!("{}", wiki.root().join("unsorted").join(&node).display())
                }
                None => {}
            }
        }
    }

    Ok(())
}
