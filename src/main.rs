mod terminal;

use std::sync::Arc;

use anyhow::{bail, Context};
use api_client::{ClinicApi, Prescription};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_core::controllers::{
    utc_today, AdminDashboard, DoctorDashboard, DoctorFilter, DoctorForm, DoctorListController,
    LoginController, PatientAppointments, SignupForm,
};
use clinic_core::{
    CardAction, FileSessionStore, ListView, PageContext, PortalConfig, Prompter, Role, Session,
    ViewNode,
};
use terminal::{SlotBooking, SlotChoice, TerminalPrompter, TerminalView};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic portal command-line client")]
struct Cli {
    /// Answer yes to every confirmation
    #[arg(long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[command(subcommand)]
        account: LoginAccount,
    },
    /// Forget the stored session
    Logout,
    /// Register as a new patient
    Signup {
        name: String,
        email: String,
        password: String,
        phone: String,
        #[arg(long)]
        address: Option<String>,
    },
    /// Show the stored role
    Whoami,
    /// Browse and manage doctors
    Doctors {
        #[command(subcommand)]
        command: DoctorCommands,
    },
    /// The logged-in doctor's appointments for a day
    Appointments {
        /// Day to show (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only patients whose name contains this
        #[arg(long)]
        name: Option<String>,
    },
    /// The logged-in patient's appointments
    MyAppointments {
        /// `past` or `future`
        #[arg(long)]
        condition: Option<String>,
        /// Only doctors whose name contains this
        #[arg(long)]
        name: Option<String>,
    },
    /// Read or write a prescription (doctors only)
    Prescription {
        #[command(subcommand)]
        command: PrescriptionCommands,
    },
}

#[derive(Subcommand)]
enum LoginAccount {
    Admin { username: String, password: String },
    Doctor { email: String, password: String },
    Patient { email: String, password: String },
}

#[derive(Subcommand)]
enum DoctorCommands {
    /// List every doctor
    List,
    /// Filter doctors; omitted criteria match everything
    Filter {
        #[arg(long, default_value = "")]
        name: String,
        /// `AM` or `PM`
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        specialty: String,
    },
    /// Add a doctor (admin only)
    Add {
        name: String,
        email: String,
        password: String,
        phone: String,
        specialty: String,
        /// Available slot, e.g. "09:00 AM"; repeatable
        #[arg(long = "time")]
        times: Vec<String>,
    },
    /// Delete a doctor (admin only)
    Delete { id: i64 },
    /// Book an appointment with a doctor (logged-in patients)
    Book {
        doctor_id: i64,
        /// Day to book (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Slot to book, e.g. "09:00 AM"; omit to list free slots
        #[arg(long)]
        time: Option<String>,
    },
}

#[derive(Subcommand)]
enum PrescriptionCommands {
    /// Show the prescription written for an appointment
    Get { appointment_id: i64 },
    /// Write a prescription for an appointment
    Save {
        appointment_id: i64,
        patient_name: String,
        medication: String,
        dosage: String,
        #[arg(long)]
        notes: Option<String>,
    },
}

const CARD_SEPARATOR: &str = "\n\n";
const ROW_SEPARATOR: &str = "\n";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = PortalConfig::from_env_values(
        std::env::var("CLINIC_API_BASE_URL").ok(),
        std::env::var("CLINIC_HTTP_TIMEOUT_SECS").ok(),
        std::env::var("CLINIC_SESSION_FILE").ok(),
    )?;
    tracing::debug!(
        base_url = %config.client().base_url(),
        session_file = %config.session_file().display(),
        "Configuration resolved"
    );

    let api = ClinicApi::new(config.client().clone())?;
    let store = FileSessionStore::open(config.session_file())
        .with_context(|| format!("opening session {}", config.session_file().display()))?;
    let session = Session::new(Arc::new(store));
    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter::new(cli.yes));

    let choice = match &cli.command {
        Commands::Doctors {
            command: DoctorCommands::Book { date, time, .. },
        } => SlotChoice {
            date: *date,
            time: time.clone(),
        },
        _ => SlotChoice::default(),
    };
    let overlay = Arc::new(SlotBooking::new(
        api.clone(),
        session.clone(),
        prompter.clone(),
        choice,
        utc_today(),
    ));
    let ctx = PageContext::new(api, session, prompter, overlay);

    run(cli.command, ctx).await
}

async fn run(command: Commands, ctx: PageContext) -> anyhow::Result<()> {
    let view = Arc::new(TerminalView::default());
    let list_view: Arc<dyn ListView> = view.clone();

    match command {
        Commands::Login { account } => {
            let login = LoginController::new(ctx.clone());
            let signed_in = match account {
                LoginAccount::Admin { username, password } => {
                    login.admin_login(&username, &password).await?
                }
                LoginAccount::Doctor { email, password } => {
                    login.doctor_login(&email, &password).await?
                }
                LoginAccount::Patient { email, password } => {
                    login.patient_login(&email, &password).await?
                }
            };
            if signed_in {
                println!("Logged in as {}.", ctx.session.role());
            }
        }
        Commands::Logout => {
            LoginController::new(ctx).logout()?;
            println!("Logged out.");
        }
        Commands::Signup {
            name,
            email,
            password,
            phone,
            address,
        } => {
            let form = SignupForm {
                name,
                email,
                password,
                phone,
                address: address.unwrap_or_default(),
            };
            LoginController::new(ctx).signup(form).await?;
        }
        Commands::Whoami => whoami(&ctx).await,
        Commands::Doctors { command } => doctors(command, ctx, list_view).await?,
        Commands::Appointments { date, name } => {
            let day = date.unwrap_or_else(utc_today);
            let dashboard = DoctorDashboard::with_clock(ctx, list_view, Arc::new(move || day));
            match name {
                Some(name) => dashboard.on_search_input(&name).await,
                None => dashboard.load().await,
            }
        }
        Commands::MyAppointments { condition, name } => {
            let mine = PatientAppointments::new(ctx, list_view);
            if mine.load().await.is_some() && (condition.is_some() || name.is_some()) {
                mine.on_filter_change(
                    condition.as_deref().unwrap_or_default(),
                    name.as_deref().unwrap_or_default(),
                )
                .await;
            }
        }
        Commands::Prescription { command } => prescription(command, &ctx).await?,
    }

    let separator = match view.nodes().first().and_then(ViewNode::as_element) {
        Some(row) if row.tag == "tr" => ROW_SEPARATOR,
        _ => CARD_SEPARATOR,
    };
    view.print(separator);
    Ok(())
}

async fn whoami(ctx: &PageContext) {
    let role = ctx.session.role();
    match (role, ctx.session.token()) {
        (Role::AnonymousOrPatient, _) | (_, None) => println!("Not logged in."),
        (Role::AuthenticatedPatient, Some(token)) => {
            match ctx.api.patients().get_by_token(&token).await {
                Some(patient) => println!("{} <{}> ({role})", patient.name, patient.email),
                None => println!("Session expired. Please log in again."),
            }
        }
        (role, Some(_)) => println!("Logged in as {role}."),
    }
}

async fn doctors(
    command: DoctorCommands,
    ctx: PageContext,
    view: Arc<dyn ListView>,
) -> anyhow::Result<()> {
    match command {
        DoctorCommands::List => DoctorListController::new(ctx, view).load().await,
        DoctorCommands::Filter {
            name,
            time,
            specialty,
        } => {
            DoctorListController::new(ctx, view)
                .on_filter_change(&DoctorFilter::new(name, time, specialty))
                .await
        }
        DoctorCommands::Add {
            name,
            email,
            password,
            phone,
            specialty,
            times,
        } => {
            let form = DoctorForm {
                name,
                email,
                password,
                phone,
                specialty,
                available_times: times,
            };
            AdminDashboard::new(ctx, view).add_doctor(form).await?;
        }
        DoctorCommands::Delete { id } => {
            let list = DoctorListController::new(ctx, view.clone());
            list.load().await;
            let action = card_action(view.as_ref(), id)?;
            if !matches!(action, CardAction::DeleteDoctor { .. }) {
                bail!("only an admin can delete doctors; run `clinic login admin` first");
            }
            list.actions().activate(&action).await;
        }
        DoctorCommands::Book { doctor_id, .. } => {
            let list = DoctorListController::new(ctx, view.clone());
            list.load().await;
            let action = card_action(view.as_ref(), doctor_id)?;
            list.actions().activate(&action).await;
            view.replace(Vec::new());
        }
    }
    Ok(())
}

/// The action bound to the card of doctor `id`.
fn card_action(view: &dyn ListView, id: i64) -> anyhow::Result<CardAction> {
    let key = id.to_string();
    let card = view
        .nodes()
        .into_iter()
        .find(|n| n.key() == Some(key.as_str()))
        .with_context(|| format!("no doctor with id {id}"))?;
    card.actions()
        .first()
        .map(|a| (*a).clone())
        .with_context(|| format!("no action available on doctor {id} for this role"))
}

async fn prescription(command: PrescriptionCommands, ctx: &PageContext) -> anyhow::Result<()> {
    let Some(token) = ctx.session.token() else {
        bail!("not logged in; run `clinic login doctor` first");
    };

    match command {
        PrescriptionCommands::Get { appointment_id } => {
            match ctx.api.prescriptions().get(appointment_id, &token).await {
                Some(p) => {
                    println!("Patient:    {}", p.patient_name);
                    println!("Medication: {}", p.medication);
                    println!("Dosage:     {}", p.dosage);
                    if let Some(notes) = p.doctor_notes {
                        println!("Notes:      {notes}");
                    }
                }
                None => println!("No prescription found for appointment {appointment_id}."),
            }
        }
        PrescriptionCommands::Save {
            appointment_id,
            patient_name,
            medication,
            dosage,
            notes,
        } => {
            let prescription = Prescription {
                id: None,
                patient_name,
                appointment_id,
                medication,
                dosage,
                doctor_notes: notes,
            };
            let result = ctx.api.prescriptions().save(&prescription, &token).await;
            ctx.prompter.alert(&result.message);
        }
    }
    Ok(())
}
