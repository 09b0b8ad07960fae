//! Walk-in CLI - Command-line client for the walk-in queue service

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "walkin")]
#[command(about = "Walk-in queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "WALKIN_RPC_URL", default_value = DEFAULT_RPC_URL, global = true)]
    rpc_url: String,

    /// Organization ID the command applies to
    #[arg(long, env = "WALKIN_ORG", global = true)]
    org: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new organization
    Register {
        /// Organization name
        name: String,

        /// Contact email
        email: String,
    },

    /// Show the current organization and its queue settings
    Org,

    /// Generate an entry code to post at the door
    EntryCode,

    /// Join the queue
    Join {
        /// Customer display name
        name: String,

        /// Customer contact (phone or email)
        contact: String,
    },

    /// Show the ticket holding a token number
    Status {
        /// Token number
        token: i64,
    },

    /// List waiting customers
    List,

    /// Mark a ticket as served
    Serve {
        /// Ticket ID
        ticket_id: String,
    },

    /// Call the next waiting customer
    Next,

    /// Call a specific waiting customer
    Call {
        /// Ticket ID
        ticket_id: String,
    },

    /// Emergency stop control
    Emergency {
        #[command(subcommand)]
        action: EmergencyAction,
    },
}

#[derive(Subcommand)]
enum EmergencyAction {
    /// Activate the emergency stop
    On {
        /// Message shown to customers
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Clear the emergency stop
    Off,

    /// Show the current emergency settings
    Show,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct TicketRow {
    #[tabled(rename = "#")]
    position: u32,
    #[tabled(rename = "Token")]
    token_number: i64,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "ETA (min)")]
    estimated_wait_minutes: u32,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Ticket ID")]
    ticket_id: String,
}

#[derive(Deserialize)]
struct ListResult {
    emergency_stop: bool,
    emergency_message: String,
    tickets: Vec<TicketRow>,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn require_org(org: &Option<String>) -> Result<&str> {
    org.as_deref()
        .context("No organization given (use --org or WALKIN_ORG)")
}

fn print_warnings(result: &serde_json::Value) {
    if let Some(warnings) = result["warnings"].as_array() {
        for warning in warnings.iter().filter_map(|w| w.as_str()) {
            println!("  {} {}", "!".yellow().bold(), warning.yellow());
        }
    }
}

fn print_emergency(stop: bool, message: &str) {
    if stop {
        println!("{}", "⚠ Emergency stop active".red().bold());
        if !message.is_empty() {
            println!("  {}", message);
        }
    } else {
        println!("{}", "Queue running normally".green());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Register { name, email } => {
            let params = json!({ "name": name, "contact_email": email });
            let result = call_rpc(&cli.rpc_url, "org.register.v1", params).await?;

            println!("{}", "✓ Organization registered".green().bold());
            println!("  {} {}", "Org ID:".bold(), result["org_id"].as_str().unwrap_or("-"));
            println!(
                "  {} {} min per person, {} min emergency penalty",
                "Settings:".bold(),
                result["per_person_minutes"],
                result["emergency_penalty_minutes"]
            );
        }

        Commands::Org => {
            let org = require_org(&cli.org)?;
            let result = call_rpc(&cli.rpc_url, "org.get.v1", json!({ "org_id": org })).await?;

            println!("{} {}", "Organization:".bold(), result["name"].as_str().unwrap_or("-"));
            println!("  {} {}", "Contact:".bold(), result["contact_email"].as_str().unwrap_or("-"));
            println!(
                "  {} {} min per person, {} min emergency penalty",
                "Settings:".bold(),
                result["per_person_minutes"],
                result["emergency_penalty_minutes"]
            );
        }

        Commands::EntryCode => {
            let org = require_org(&cli.org)?;
            let result =
                call_rpc(&cli.rpc_url, "org.entry_code.v1", json!({ "org_id": org })).await?;

            println!(
                "{} {}",
                "Entry code:".green().bold(),
                result["code"].as_str().unwrap_or("-").bold()
            );
            println!("  {}", result["rendered"].as_str().unwrap_or("-"));
        }

        Commands::Join { name, contact } => {
            let org = require_org(&cli.org)?;
            let params = json!({ "org_id": org, "display_name": name, "contact": contact });
            let result = call_rpc(&cli.rpc_url, "queue.join.v1", params).await?;
            let ticket = &result["ticket"];

            if result["existing"].as_bool().unwrap_or(false) {
                println!("{}", "Already in the queue".yellow().bold());
            } else {
                println!("{}", "✓ Joined the queue".green().bold());
            }
            println!("  {} {}", "Token:".bold(), ticket["token_number"]);
            println!("  {} {}", "Position:".bold(), ticket["position"]);
            println!("  {} {} min", "Estimated wait:".bold(), ticket["estimated_wait_minutes"]);
            println!("  {} {}", "Ticket ID:".bold(), ticket["ticket_id"].as_str().unwrap_or("-"));
            if result["emergency_stop"].as_bool().unwrap_or(false) {
                print_emergency(true, result["emergency_message"].as_str().unwrap_or(""));
            }
            print_warnings(&result);
        }

        Commands::Status { token } => {
            let org = require_org(&cli.org)?;
            let params = json!({ "org_id": org, "token_number": token });
            let result = call_rpc(&cli.rpc_url, "queue.status.v1", params).await?;
            let row: TicketRow = serde_json::from_value(result)?;

            println!("{}", Table::new(vec![row]));
        }

        Commands::List => {
            let org = require_org(&cli.org)?;
            let result = call_rpc(&cli.rpc_url, "queue.list.v1", json!({ "org_id": org })).await?;
            let list: ListResult = serde_json::from_value(result)?;

            if list.emergency_stop {
                print_emergency(true, &list.emergency_message);
                println!();
            }
            if list.tickets.is_empty() {
                println!("{}", "Nobody is waiting".cyan());
            } else {
                println!("{}", Table::new(list.tickets));
            }
        }

        Commands::Serve { ticket_id } => {
            let org = require_org(&cli.org)?;
            let params = json!({ "org_id": org, "ticket_id": ticket_id });
            let result = call_rpc(&cli.rpc_url, "queue.serve.v1", params).await?;

            println!(
                "{}",
                format!("✓ Token {} served", result["ticket"]["token_number"])
                    .green()
                    .bold()
            );
            print_warnings(&result);
        }

        Commands::Next => {
            let org = require_org(&cli.org)?;
            let result =
                call_rpc(&cli.rpc_url, "queue.call_next.v1", json!({ "org_id": org })).await?;

            if result["ticket"].is_null() {
                println!("{}", "Nobody is waiting".cyan());
            } else {
                let ticket = &result["ticket"];
                println!(
                    "{} {} ({})",
                    "Now calling token".green().bold(),
                    ticket["token_number"],
                    ticket["display_name"].as_str().unwrap_or("-")
                );
                print_warnings(&result);
            }
        }

        Commands::Call { ticket_id } => {
            let org = require_org(&cli.org)?;
            let params = json!({ "org_id": org, "ticket_id": ticket_id });
            let result = call_rpc(&cli.rpc_url, "queue.begin_processing.v1", params).await?;

            println!(
                "{} {}",
                "Now calling token".green().bold(),
                result["ticket"]["token_number"]
            );
            print_warnings(&result);
        }

        Commands::Emergency { action } => {
            let org = require_org(&cli.org)?;
            let result = match action {
                EmergencyAction::On { message } => {
                    let params = json!({ "org_id": org, "stop": true, "message": message });
                    call_rpc(&cli.rpc_url, "queue.emergency.set.v1", params).await?
                }
                EmergencyAction::Off => {
                    let params = json!({ "org_id": org, "stop": false });
                    call_rpc(&cli.rpc_url, "queue.emergency.set.v1", params).await?
                }
                EmergencyAction::Show => {
                    call_rpc(&cli.rpc_url, "queue.emergency.get.v1", json!({ "org_id": org }))
                        .await?
                }
            };

            print_emergency(
                result["emergency_stop"].as_bool().unwrap_or(false),
                result["emergency_message"].as_str().unwrap_or(""),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join() {
        let cli = Cli::try_parse_from(["walkin", "--org", "org-1", "join", "Bob", "555-2"]).unwrap();
        assert_eq!(cli.org.as_deref(), Some("org-1"));
        assert!(matches!(cli.command, Commands::Join { ref name, .. } if name == "Bob"));
    }

    #[test]
    fn test_parse_emergency_on() {
        let cli = Cli::try_parse_from([
            "walkin",
            "emergency",
            "on",
            "--message",
            "Back at 3pm",
            "--org",
            "org-1",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Emergency {
                action: EmergencyAction::On { message: Some(ref m) }
            } if m == "Back at 3pm"
        ));
    }

    #[test]
    fn test_parse_entry_code() {
        let cli = Cli::try_parse_from(["walkin", "entry-code", "--org", "org-1"]).unwrap();
        assert!(matches!(cli.command, Commands::EntryCode));
        assert_eq!(cli.org.as_deref(), Some("org-1"));
    }

    #[test]
    fn test_require_org() {
        assert!(require_org(&None).is_err());
        assert_eq!(require_org(&Some("org-1".to_string())).unwrap(), "org-1");
    }

    #[test]
    fn test_ticket_row_from_rpc_payload() {
        let row: TicketRow = serde_json::from_value(json!({
            "ticket_id": "t-1",
            "token_number": 4,
            "display_name": "Bob",
            "contact": "555-2",
            "status": "WAITING",
            "position": 2,
            "estimated_wait_minutes": 10,
            "created_at": 0
        }))
        .unwrap();
        assert_eq!(row.token_number, 4);
        assert_eq!(row.position, 2);
    }
}
