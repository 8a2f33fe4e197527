//! ledger-console: role-scoped operator console for the wallet ledger and
//! payout orchestrator services.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use ledger_console::config::get_configuration;
use ledger_console::models::{EntriesFilter, Identity, ReferenceType, Role, WalletType};
use ledger_console::observability::init_tracing;
use ledger_console::routing::{EntryPoint, RouteDecision};
use ledger_console::session::ExpiryGuard;
use ledger_console::utils::IdempotencyKey;
use ledger_console::workflows::{
    available_actions, Activate, AddVendorForm, AdminDashboard, BankDetailsEditor,
    BankDetailsForm, CommissionEarnings, CreatePayoutForm, ErrorSlot, EscrowBalance,
    LedgerExplorer, MerchantDashboard, MerchantList, OrderCompletion, OrderSettlement,
    PaymentSuccessForm, PayoutAction, PayoutManagement, PayoutRequestForm, RequestPayout,
    SettlementReport, VendorDashboard, VendorManagement, VendorPayouts, VendorWallets,
    WalletAdmin,
};
use ledger_console::AppState;
use secrecy::Secret;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "ledger-console")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and show the landing view for your role
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(long, env = "LEDGER_CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and wipe the stored session
    Logout,

    /// Show the signed-in identity and the views it may open
    Whoami,

    /// Landing view for your role
    Dashboard,

    /// Page through every merchant on the platform
    Merchants {
        #[arg(long, default_value = "0")]
        page: u32,
    },

    /// List the merchant's vendors
    Vendors,

    /// The merchant's vendors with their wallet balances
    VendorWallets,

    /// The merchant's INR escrow balance
    Escrow,

    /// Show the commission rate, or set it with --set
    Commission {
        /// Percentage between 0 and 100
        #[arg(long)]
        set: Option<String>,
    },

    /// Create a vendor under the signed-in merchant
    AddVendor {
        #[arg(short, long)]
        username: String,

        #[arg(long, env = "LEDGER_CONSOLE_VENDOR_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        currency: Option<String>,
    },

    /// Record a payment success: credits the merchant escrow for an order
    PaymentSuccess {
        #[arg(long)]
        vendor: Uuid,

        #[arg(long)]
        order: String,

        #[arg(long)]
        amount: String,

        #[arg(long)]
        currency: Option<String>,
    },

    /// Orders of a vendor awaiting their escrow split
    PendingOrders {
        #[arg(long)]
        vendor: Uuid,
    },

    /// Escrow credits recorded for the merchant's orders
    Payments {
        #[arg(long, default_value = "0")]
        page: u32,
    },

    /// Split a pending order's escrow into the main and vendor wallets
    CompleteOrder {
        #[arg(long)]
        vendor: Uuid,

        #[arg(long)]
        order: String,
    },

    /// List payouts (all for admins, your own for vendors)
    Payouts,

    /// Confirm a PROCESSING payout
    ConfirmPayout {
        payout_id: Uuid,

        /// Resubmit an earlier attempt with its key
        #[arg(long)]
        idempotency_key: Option<String>,
    },

    /// Reverse a PROCESSING payout
    ReversePayout {
        payout_id: Uuid,

        #[arg(long)]
        idempotency_key: Option<String>,
    },

    /// Open a payout for a vendor's wallet
    CreatePayout {
        #[arg(long)]
        merchant: Uuid,

        #[arg(long)]
        vendor: Uuid,

        #[arg(long)]
        vendor_wallet: Uuid,

        #[arg(long)]
        amount: String,

        #[arg(long)]
        currency: Option<String>,

        #[arg(long)]
        idempotency_key: Option<String>,
    },

    /// Request a payout from your vendor wallet
    RequestPayout {
        #[arg(long)]
        amount: String,

        #[arg(long)]
        currency: Option<String>,

        #[arg(long)]
        idempotency_key: Option<String>,
    },

    /// Show your payout bank account, or replace it
    BankDetails {
        #[arg(long)]
        account_number: Option<String>,

        #[arg(long)]
        ifsc: Option<String>,

        #[arg(long)]
        beneficiary: Option<String>,
    },

    /// Freeze a wallet
    Freeze { wallet_id: Uuid },

    /// Unfreeze a wallet
    Unfreeze { wallet_id: Uuid },

    /// Resolve a merchant's MAIN or ESCROW wallet
    Wallet {
        #[arg(long)]
        merchant: Uuid,

        #[arg(long, default_value = "escrow")]
        wallet_type: String,

        #[arg(long)]
        currency: Option<String>,
    },

    /// Browse ledger entries
    Entries {
        #[arg(long)]
        wallet: Option<Uuid>,

        #[arg(long)]
        merchant: Option<Uuid>,

        #[arg(long, default_value = "0")]
        page: u32,

        #[arg(long, default_value = "20")]
        size: u32,
    },

    /// Escrow settlement: your own as a merchant, any merchant's as an admin
    Settlement {
        #[arg(long)]
        merchant: Option<Uuid>,

        #[arg(long)]
        currency: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("ledger-console", &configuration.telemetry)?;

    let state = AppState::from_settings(&configuration);
    state
        .session
        .init()
        .context("Failed to restore session")?;

    let result = run(&state, cli.command).await;

    if state.session.expiry_guard() != ExpiryGuard::Active {
        eprintln!("Session expired. Run `ledger-console login` to sign in again.");
    }

    opentelemetry::global::shutdown_tracer_provider();
    result
}

async fn run(state: &AppState, command: Commands) -> anyhow::Result<()> {
    let identity = state.session.identity();

    match command {
        Commands::Login { username, password } => {
            let decision = state
                .login(&username, &Secret::new(password))
                .await
                .context("Login failed")?;
            match decision {
                RouteDecision::Allow(entry) => {
                    println!("Signed in as {}.", username);
                    open_landing(state, entry).await?;
                }
                _ => println!(
                    "Signed in as {}, but this account has no console views.",
                    username
                ),
            }
        }
        Commands::Logout => {
            state.session.logout()?;
            println!("Signed out.");
        }
        Commands::Whoami => {
            let identity = identity.context("Not signed in")?;
            print_identity(&identity);
        }
        Commands::Dashboard => match ledger_console::routing::landing_for(identity.as_ref()) {
            RouteDecision::Allow(entry) => open_landing(state, entry).await?,
            decision => deny(decision)?,
        },
        Commands::Merchants { page } => {
            guard(state, EntryPoint::MerchantList)?;
            let mut view = MerchantList::new(state.gateway.clone());
            view.go_to(page).await;
            report(&view.error)?;
            if view.merchants.is_empty() {
                println!("No merchants.");
            }
            for merchant in &view.merchants {
                println!(
                    "{:<20}  user {}  merchant {}",
                    merchant.username,
                    merchant.id,
                    display_id(merchant.merchant_id)
                );
            }
            println!(
                "Page {} of {} ({} total)",
                view.page + 1,
                view.total_pages.max(1),
                view.total_elements
            );
        }
        Commands::Vendors => {
            let identity = guard(state, EntryPoint::VendorManagement)?;
            let mut view = VendorManagement::new(state.gateway.clone(), &identity);
            view.activate().await;
            report(&view.error)?;
            for vendor in &view.vendors {
                println!(
                    "{}  {:<20}  wallet {}",
                    vendor.user_id,
                    vendor.username,
                    display_id(vendor.vendor_wallet_id)
                );
            }
        }
        Commands::VendorWallets => {
            let identity = guard(state, EntryPoint::VendorWallets)?;
            let mut view = VendorWallets::new(state.gateway.clone(), &identity);
            view.activate().await;
            warn_slot(&view.error);
            if view.rows.is_empty() && view.error.is_empty() {
                println!("No vendors.");
            }
            for row in &view.rows {
                let balance = match &row.wallet {
                    Some(w) => format!("{} {}  ({})", w.balance, w.currency_code, w.status),
                    None => "-".to_string(),
                };
                println!(
                    "{}  {:<20}  wallet {}  {}",
                    row.vendor.user_id,
                    row.vendor.username,
                    display_id(row.vendor.vendor_wallet_id),
                    balance
                );
            }
        }
        Commands::Escrow => {
            let identity = guard(state, EntryPoint::EscrowBalance)?;
            let mut view = EscrowBalance::new(state.gateway.clone(), &identity);
            view.activate().await;
            report(&view.error)?;
            match &view.wallet {
                Some(w) => {
                    println!("{} {}", w.balance, w.currency_code);
                    println!("Wallet ID: {}", display_id(w.id));
                }
                None => println!("No escrow wallet data."),
            }
        }
        Commands::Commission { set } => {
            let identity = guard(state, EntryPoint::CommissionEarnings)?;
            let mut view = CommissionEarnings::new(state.gateway.clone(), &identity);
            match set {
                Some(rate) => {
                    let rate = view
                        .set_rate(&rate)
                        .await
                        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
                    println!("Commission rate set to {}%.", rate);
                }
                None => {
                    view.activate().await;
                    report(&view.error)?;
                    match view.rate() {
                        Some(rate) => println!("Current rate: {}%", rate),
                        None => println!("Current rate: Not set"),
                    }
                }
            }
        }
        Commands::AddVendor {
            username,
            password,
            currency,
        } => {
            let identity = guard(state, EntryPoint::VendorManagement)?;
            let mut view = VendorManagement::new(state.gateway.clone(), &identity);
            let form = AddVendorForm {
                username,
                password: Secret::new(password),
                currency_code: currency,
            };
            view.add_vendor(&form)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            if let Some(message) = &view.message {
                println!("{}", message);
            }
        }
        Commands::PaymentSuccess {
            vendor,
            order,
            amount,
            currency,
        } => {
            let identity = guard(state, EntryPoint::OrderCompletion)?;
            let mut view = OrderCompletion::new(state.gateway.clone(), &identity);
            view.load().await;
            report(&view.load_error)?;
            let form = PaymentSuccessForm {
                vendor_id: Some(vendor),
                order_id: order,
                amount,
                currency_code: currency,
            };
            let message = view
                .record_payment_success(&form)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}", message);
        }
        Commands::PendingOrders { vendor } => {
            let identity = guard(state, EntryPoint::OrderCompletion)?;
            let mut view = OrderCompletion::new(state.gateway.clone(), &identity);
            view.select_vendor(Some(vendor)).await;
            report(&view.error)?;
            if view.pending_orders().is_empty() {
                println!("No pending orders.");
            }
            for order in view.pending_orders() {
                println!(
                    "{:<24}  {:>12} {}",
                    order.order_id,
                    order.amount,
                    order.currency_code.as_deref().unwrap_or("INR")
                );
            }
        }
        Commands::Payments { page } => {
            let identity = guard(state, EntryPoint::PaymentRecords)?;
            let merchant_id = identity
                .merchant_affiliation
                .context("Merchant ID not found.")?;
            let filter = EntriesFilter {
                merchant_id: Some(merchant_id),
                reference_type: Some(ReferenceType::Order),
                page,
                ..Default::default()
            };
            let mut view = LedgerExplorer::new(state.gateway.clone());
            view.load(&filter).await;
            report(&view.error)?;
            print_entries(&view);
        }
        Commands::CompleteOrder { vendor, order } => {
            let identity = guard(state, EntryPoint::OrderCompletion)?;
            let mut view = OrderCompletion::new(state.gateway.clone(), &identity);
            view.load().await;
            report(&view.load_error)?;
            view.select_vendor(Some(vendor)).await;
            report(&view.error)?;
            view.select_order(&order)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let message = view
                .complete_selected_order()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}", message);
            println!(
                "{} order(s) still pending for this vendor.",
                view.pending_orders().len()
            );
        }
        Commands::Payouts => {
            let is_admin = identity
                .as_ref()
                .map(|i| i.has_role(Role::Admin))
                .unwrap_or(false);
            if is_admin {
                guard(state, EntryPoint::PayoutManagement)?;
                let mut view = PayoutManagement::new(state.gateway.clone());
                view.activate().await;
                report(&view.error)?;
                print_payouts(&view.payouts, true);
                println!("Total: {}", view.total_elements);
            } else {
                guard(state, EntryPoint::PayoutStatus)?;
                let mut view = VendorPayouts::new(state.gateway.clone());
                view.activate().await;
                report(&view.error)?;
                print_payouts(&view.payouts, false);
                println!("Total: {}", view.total_elements);
            }
        }
        Commands::ConfirmPayout {
            payout_id,
            idempotency_key,
        } => {
            payout_action(state, payout_id, idempotency_key, true).await?;
        }
        Commands::ReversePayout {
            payout_id,
            idempotency_key,
        } => {
            payout_action(state, payout_id, idempotency_key, false).await?;
        }
        Commands::CreatePayout {
            merchant,
            vendor,
            vendor_wallet,
            amount,
            currency,
            idempotency_key,
        } => {
            guard(state, EntryPoint::PayoutManagement)?;
            let mut view = PayoutManagement::new(state.gateway.clone());
            let form = CreatePayoutForm {
                merchant_id: Some(merchant),
                vendor_id: Some(vendor),
                vendor_wallet_id: Some(vendor_wallet),
                amount,
                currency_code: currency,
            };
            let payout = view
                .create(&form, idempotency_key.map(IdempotencyKey::reuse))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!(
                "Payout created: {} {} {} ({})",
                payout.id, payout.amount, payout.currency_code, payout.status
            );
        }
        Commands::RequestPayout {
            amount,
            currency,
            idempotency_key,
        } => {
            guard(state, EntryPoint::RequestPayout)?;
            let mut view = RequestPayout::new(state.gateway.clone());
            let form = PayoutRequestForm {
                amount,
                currency_code: currency,
            };
            let payout = view
                .submit(&form, idempotency_key.map(IdempotencyKey::reuse))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!(
                "Payout created: {} {} {} ({})",
                payout.id,
                payout.amount,
                payout.currency_code,
                payout.status
            );
        }
        Commands::BankDetails {
            account_number,
            ifsc,
            beneficiary,
        } => {
            guard(state, EntryPoint::BankDetails)?;
            let mut view = BankDetailsEditor::new(state.gateway.clone());
            if account_number.is_some() || beneficiary.is_some() {
                let form = BankDetailsForm {
                    account_number: account_number.unwrap_or_default(),
                    ifsc_code: ifsc,
                    beneficiary_name: beneficiary.unwrap_or_default(),
                };
                view.save(&form)
                    .await
                    .map_err(|e| anyhow::anyhow!(e.user_message()))?;
                println!("Bank details saved.");
            } else {
                view.activate().await;
                report(&view.error)?;
            }
            match &view.details {
                Some(details) => {
                    println!("Account number:   {}", details.account_number);
                    println!(
                        "IFSC code:        {}",
                        details.ifsc_code.as_deref().unwrap_or("-")
                    );
                    println!("Beneficiary name: {}", details.beneficiary_name);
                    if let Some(updated_at) = details.updated_at {
                        println!("Last updated:     {}", updated_at.format("%Y-%m-%d %H:%M"));
                    }
                }
                None => println!("No bank details saved."),
            }
        }
        Commands::Freeze { wallet_id } => {
            guard(state, EntryPoint::FreezeWallet)?;
            let mut view = WalletAdmin::new(state.gateway.clone());
            view.freeze(Some(wallet_id))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            print_wallet_change(&view);
        }
        Commands::Unfreeze { wallet_id } => {
            guard(state, EntryPoint::FreezeWallet)?;
            let mut view = WalletAdmin::new(state.gateway.clone());
            view.unfreeze(Some(wallet_id))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            print_wallet_change(&view);
        }
        Commands::Wallet {
            merchant,
            wallet_type,
            currency,
        } => {
            guard(state, EntryPoint::WalletSearch)?;
            let wallet_type = match wallet_type.to_ascii_uppercase().as_str() {
                "MAIN" => WalletType::Main,
                "ESCROW" => WalletType::Escrow,
                other => anyhow::bail!("Unknown wallet type: {}", other),
            };
            let mut view = WalletAdmin::new(state.gateway.clone());
            let wallet = view
                .lookup(Some(merchant), currency.as_deref(), wallet_type)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!(
                "{}  {} {}  ({})",
                display_id(wallet.id),
                wallet.balance,
                wallet.currency_code,
                wallet.status
            );
        }
        Commands::Entries {
            wallet,
            merchant,
            page,
            size,
        } => {
            let role = identity
                .as_ref()
                .and_then(|i| i.routable_roles().first().copied());
            let entry = match role {
                Some(Role::Admin) => EntryPoint::AdminTransactions,
                Some(Role::Merchant) => EntryPoint::MerchantTransactions,
                _ => EntryPoint::VendorTransactions,
            };
            guard(state, entry)?;
            let filter = EntriesFilter {
                wallet_id: wallet,
                merchant_id: merchant,
                page,
                size,
                ..Default::default()
            };
            let mut view = LedgerExplorer::new(state.gateway.clone());
            view.load(&filter).await;
            report(&view.error)?;
            print_entries(&view);
        }
        Commands::Settlement { merchant, currency } => {
            let is_admin = identity
                .as_ref()
                .map(|i| i.has_role(Role::Admin))
                .unwrap_or(false);
            if is_admin {
                guard(state, EntryPoint::SettlementReport)?;
                let mut view = SettlementReport::new(state.gateway.clone());
                let settlement = view
                    .lookup(merchant, currency.as_deref())
                    .await
                    .map_err(|e| anyhow::anyhow!(e.user_message()))?;
                print_settlement(settlement);
            } else {
                let identity = guard(state, EntryPoint::OrderSettlement)?;
                let mut view = OrderSettlement::new(state.gateway.clone(), &identity);
                view.activate().await;
                report(&view.error)?;
                if let Some(settlement) = &view.settlement {
                    print_settlement(settlement);
                }
                match &view.commission {
                    Some(c) => println!(
                        "Commission: {:?} {}%",
                        c.commission_type,
                        c.percentage_value.unwrap_or_default()
                    ),
                    None => println!("Commission: not configured"),
                }
            }
        }
    }

    Ok(())
}

/// Check the router before opening a view. Returns the identity it was opened for.
fn guard(state: &AppState, entry: EntryPoint) -> anyhow::Result<Identity> {
    match state.route(entry) {
        RouteDecision::Allow(_) => state
            .session
            .identity()
            .context("Session ended while opening view"),
        decision => {
            deny(decision)?;
            anyhow::bail!("Access denied")
        }
    }
}

fn deny(decision: RouteDecision) -> anyhow::Result<()> {
    match decision {
        RouteDecision::Login => {
            anyhow::bail!("Not signed in. Run `ledger-console login` first.")
        }
        RouteDecision::AccessDenied => {
            anyhow::bail!("Access denied: your role cannot open this view.")
        }
        RouteDecision::Allow(_) => Ok(()),
    }
}

async fn open_landing(state: &AppState, entry: EntryPoint) -> anyhow::Result<()> {
    println!("Landing view: {}", entry);
    match entry {
        EntryPoint::AdminDashboard => {
            let mut view = AdminDashboard::new(state.gateway.clone());
            view.activate().await;
            warn_slot(&view.error);
            if let Some(stats) = &view.platform_stats {
                println!(
                    "Merchants {}  Vendors {}  Wallets {} ({} frozen)  Ledger entries {}",
                    stats.total_merchants,
                    stats.total_vendors,
                    stats.total_wallets,
                    stats.frozen_wallets,
                    stats.total_ledger_entries
                );
            }
            if let Some(stats) = &view.payout_stats {
                println!(
                    "Payouts {}  processing {}  settled {}  failed {}  settled amount {}",
                    stats.total_payouts,
                    stats.processing_count,
                    stats.settled_count,
                    stats.failed_count,
                    stats.total_settled_amount
                );
            }
            for merchant in &view.recent_merchants {
                println!("  {:<20} {}", merchant.username, display_id(merchant.merchant_id));
            }
        }
        EntryPoint::MerchantDashboard => {
            let mut view = MerchantDashboard::new(state.gateway.clone());
            view.activate().await;
            warn_slot(&view.error);
            let wallets = [("MAIN", &view.main_wallet), ("ESCROW", &view.escrow_wallet)];
            for (label, wallet) in wallets {
                match wallet {
                    Some(w) => println!(
                        "{:<6} {} {}  ({})",
                        label, w.balance, w.currency_code, w.status
                    ),
                    None => println!("{:<6} not available", label),
                }
            }
        }
        EntryPoint::VendorDashboard => {
            let mut view = VendorDashboard::new(state.gateway.clone());
            view.activate().await;
            warn_slot(&view.error);
            match &view.wallet {
                Some(w) => println!("VENDOR {} {}  ({})", w.balance, w.currency_code, w.status),
                None => println!("No vendor wallet found for your account."),
            }
        }
        other => println!("Run `ledger-console {}`.", command_for(other)),
    }
    Ok(())
}

async fn payout_action(
    state: &AppState,
    payout_id: Uuid,
    key: Option<String>,
    confirm: bool,
) -> anyhow::Result<()> {
    guard(state, EntryPoint::PayoutManagement)?;
    let mut view = PayoutManagement::new(state.gateway.clone());
    view.load().await;
    report(&view.error)?;

    let action = if confirm {
        PayoutAction::Confirm
    } else {
        PayoutAction::Reverse
    };
    let payout = view
        .apply(payout_id, action, key.map(IdempotencyKey::reuse))
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!("Payout {} is now {}.", payout.id, payout.status);
    Ok(())
}

/// The subcommand that opens each view.
fn command_for(entry: EntryPoint) -> &'static str {
    match entry {
        EntryPoint::AdminDashboard
        | EntryPoint::MerchantDashboard
        | EntryPoint::VendorDashboard => "dashboard",
        EntryPoint::MerchantList => "merchants",
        EntryPoint::WalletSearch => "wallet",
        EntryPoint::AdminTransactions
        | EntryPoint::MerchantTransactions
        | EntryPoint::VendorTransactions => "entries",
        EntryPoint::FreezeWallet => "freeze | unfreeze",
        EntryPoint::SettlementReport | EntryPoint::OrderSettlement => "settlement",
        EntryPoint::PayoutManagement => "payouts | confirm-payout | reverse-payout | create-payout",
        EntryPoint::VendorManagement => "vendors | add-vendor",
        EntryPoint::VendorWallets => "vendor-wallets",
        EntryPoint::CommissionEarnings => "commission",
        EntryPoint::EscrowBalance => "escrow",
        EntryPoint::OrderCompletion => "pending-orders | complete-order | payment-success",
        EntryPoint::PaymentRecords => "payments",
        EntryPoint::RequestPayout => "request-payout",
        EntryPoint::PayoutStatus => "payouts",
        EntryPoint::BankDetails => "bank-details",
    }
}

fn print_identity(identity: &Identity) {
    println!("Subject:  {}", identity.subject);
    println!(
        "Roles:    {}",
        identity.roles.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    println!("Merchant: {}", display_id(identity.merchant_affiliation));
    for role in identity.routable_roles() {
        println!("{} views:", role);
        for entry in EntryPoint::permitted_for(role) {
            println!("  {:<28} {}", entry.path(), command_for(entry));
        }
    }
}

fn print_payouts(payouts: &[ledger_console::models::Payout], with_actions: bool) {
    for payout in payouts {
        let actions: Vec<&str> = available_actions(payout.status)
            .iter()
            .map(|a| a.as_str())
            .collect();
        println!(
            "{}  {:>12} {}  {:<10} {}",
            payout.id,
            payout.amount,
            payout.currency_code,
            payout.status,
            if with_actions { actions.join("/") } else { String::new() }
        );
    }
}

fn print_entries(view: &LedgerExplorer) {
    for entry in &view.entries {
        println!(
            "{}  {:<6} {:>12} {}  {:<9} {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            format!("{:?}", entry.entry_type).to_uppercase(),
            entry.amount,
            entry.currency_code,
            entry.status.as_str(),
            entry.reference_id.as_deref().unwrap_or("")
        );
    }
    println!("Total: {}", view.total_entries);
}

fn print_wallet_change(view: &WalletAdmin) {
    if let Some((Some(change), wallet)) = &view.result {
        println!(
            "{}. Balance: {} {} (status: {})",
            change, wallet.balance, wallet.currency_code, wallet.status
        );
    }
}

fn print_settlement(settlement: &ledger_console::models::Settlement) {
    println!("Merchant:                  {}", settlement.merchant_id);
    println!(
        "Total confirmed credits:   {} {}",
        settlement.total_confirmed_escrow_credits, settlement.currency_code
    );
    println!("Total payout debits:       {}", settlement.total_payout_debits);
    println!("Total refund debits:       {}", settlement.total_refund_debits);
    println!("Expected balance:          {}", settlement.expected_balance);
    println!("Ledger net balance:        {}", settlement.ledger_net_balance);
    println!(
        "Reconciled:                {}",
        if settlement.reconciled { "yes" } else { "NO" }
    );
}

/// A read failure aborts the command with the view's message.
fn report(slot: &ErrorSlot) -> anyhow::Result<()> {
    match slot.get() {
        Some(message) => anyhow::bail!("{}", message),
        None => Ok(()),
    }
}

/// Dashboards still render what loaded; the error is printed alongside.
fn warn_slot(slot: &ErrorSlot) {
    if let Some(message) = slot.get() {
        eprintln!("Error: {}", message);
    }
}

fn display_id(id: Option<Uuid>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}
