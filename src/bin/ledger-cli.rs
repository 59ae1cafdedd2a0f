#![forbid(unsafe_code)]
use clap::{Parser, Subcommand};
use colored::*;
use ledgerchain::config::{load_config, DEFAULT_CONFIG_PATH};
use ledgerchain::node::{init_tracing, Node, Submission};
use ledgerchain::primitives::{Amount, WalletAddress};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a key pair and prints its derived address
    Keygen,
    /// Signs a transfer from a fresh key pair and submits it to the ledger
    Transfer {
        /// Amount to send
        #[arg(long)]
        amount: i64,
        /// Recipient address; a fresh one is generated when omitted
        #[arg(long)]
        to: Option<String>,
    },
    /// Prints every block in the chain
    Chain,
    /// Re-checks every hash and link in the chain
    Verify,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_tracing(&config.logging.level)?;
    let node = Node::init(config)?;

    match cli.command {
        Commands::Keygen => keygen(&node)?,
        Commands::Transfer { amount, to } => transfer(&node, amount, to)?,
        Commands::Chain => print_chain(&node)?,
        Commands::Verify => verify(&node)?,
    }

    Ok(())
}

fn keygen(node: &Node) -> Result<(), Box<dyn std::error::Error>> {
    let keypair = node.generate_key_pair()?;
    println!("{}", "🔑 New key pair".bright_cyan().bold());
    println!("  {} {}", "Address:    ".bright_white(), keypair.address()?.to_string().green());
    println!("  {} {}", "Public key: ".bright_white(), keypair.public_key_bytes().to_hex());
    println!("  {} {}", "Secret key: ".bright_white(), hex::encode(keypair.secret_bytes()).yellow());
    Ok(())
}

fn transfer(node: &Node, amount: i64, to: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let amount = Amount::new(amount)?;
    let sender = node.generate_key_pair()?;
    let recipient = match to {
        Some(raw) => WalletAddress::new(raw)?,
        None => node.generate_key_pair()?.address()?,
    };

    println!("{}", "📤 Submitting transfer...".bright_cyan());
    println!("  From:   {}", sender.address()?.to_string().bright_white());
    println!("  To:     {}", recipient.to_string().bright_white());
    println!("  Amount: {}", amount.to_string().bright_yellow());

    let tx = node.create_transaction(&sender, recipient, amount)?;
    match node.submit_transaction(tx)? {
        Submission::Appended { result, block } => {
            let tx_id = result.tx_id.map(|id| id.to_string()).unwrap_or_default();
            println!("{}", "✅ Transaction accepted".green().bold());
            println!("  TxId:  {}", tx_id);
            println!("  Block: #{} {}", block.index, block.hash);
        }
        Submission::NotAppended { outcome, .. } => {
            println!(
                "{} {:?}",
                "⚠️  Transaction validated but its block was not appended:".yellow().bold(),
                outcome
            );
        }
        Submission::Rejected(result) => {
            println!("{}", "❌ Transaction rejected".red().bold());
            for error in &result.errors {
                println!("  - {}", error.to_string().red());
            }
        }
    }
    Ok(())
}

fn print_chain(node: &Node) -> Result<(), Box<dyn std::error::Error>> {
    let blocks = node.ledger.blocks()?;
    println!("{}", format!("⛓️  {} block(s)", blocks.len()).bright_cyan().bold());
    for block in blocks {
        println!();
        println!("{}", format!("Block #{}", block.index).bright_magenta().bold());
        println!("  Hash:      {}", block.hash);
        println!("  Previous:  {}", block.previous_hash);
        println!("  Timestamp: {}", format_timestamp(block.timestamp));
        println!("  Nonce:     {}", block.nonce);
        for tx in &block.transactions {
            println!("  • {} → {} : {}", tx.from, tx.to, tx.amount.to_string().bright_yellow());
        }
    }
    Ok(())
}

fn verify(node: &Node) -> Result<(), Box<dyn std::error::Error>> {
    match node.ledger.verify_chain() {
        Ok(()) => {
            println!("{}", "✅ Chain is valid".green().bold());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "❌ Chain verification failed:".red().bold(), e);
            Err(e.into())
        }
    }
}

fn format_timestamp(millis: u64) -> String {
    chrono::DateTime::from_timestamp_millis(millis as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}
