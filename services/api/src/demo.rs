use chrono::{Duration, Local};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use safeyatri::band::{BandEvent, BandSettings, SmartBand};
use safeyatri::catalog::{chat, pricing, NewsFilter, PriceQuote};
use safeyatri::config::SimulationConfig;
use safeyatri::error::AppError;
use safeyatri::flow::{Companion, SignupForm, TripForm};
use safeyatri::navigation::Screen;
use safeyatri::notify::Notification;
use safeyatri::simulate::Latency;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Multiplier for simulated network delays (0 resolves them immediately)
    #[arg(long, default_value_t = 0.0)]
    pub(crate) latency_scale: f64,
    /// Destination used for the safe-route step
    #[arg(long, default_value = "Red Fort")]
    pub(crate) destination: String,
    /// Item scanned by the price assistant
    #[arg(long, default_value = "wooden elephant")]
    pub(crate) item: String,
}

#[derive(Args, Debug)]
pub(crate) struct BandArgs {
    /// Number of heart-rate readings to print before stopping
    #[arg(long, default_value_t = 10)]
    pub(crate) ticks: usize,
    /// Seed for reproducible readings
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Heart-rate sampling interval in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub(crate) interval_ms: u64,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        latency_scale,
        destination,
        item,
    } = args;

    let companion = Companion::new(Latency::new(latency_scale));
    println!("SafeYatri companion demo");

    println!("\nOnboarding");
    companion.navigate(Screen::Signup)?;
    let traveler = companion.signup(demo_signup()).await?;
    println!("- Signed up {} <{}>", traveler.name, traveler.email);
    let progress = companion.verify_profile().await?;
    for step in &progress.completed {
        println!("  - {} passed", step.label());
    }
    println!("- Profile {}% complete", progress.percent);
    companion.navigate(Screen::DigitalId)?;
    let card = companion.issue_digital_id().await?;
    println!(
        "- Digital ID {} issued to {} ({})",
        card.id, card.name, card.blockchain_hash
    );
    companion.navigate(Screen::Dashboard)?;
    print_notifications(&companion);

    let dashboard = companion.dashboard()?;
    println!(
        "\nDashboard: safety score {} ({}) at {} | language {}",
        dashboard.safety_score,
        dashboard.safety_label,
        dashboard.current_location,
        dashboard.language.label()
    );
    for tile in &dashboard.features {
        println!("  - {}: {} [{}]", tile.title, tile.description, tile.screen);
    }

    println!("\nSafe routes to {destination}");
    companion.navigate(Screen::SafeRoute)?;
    for route in companion.calculate_routes(&destination).await? {
        println!(
            "- {}: {:.1} km, {} min, safety {}/100",
            route.label, route.distance_km, route.eta_minutes, route.safety_score
        );
    }
    let chosen = companion.select_route("safest").await?;
    println!("  Navigating via {}", chosen.label);
    print_notifications(&companion);

    println!("\nLocal risk news");
    companion.navigate(Screen::RiskNews)?;
    for news in companion.risk_news(&NewsFilter::default())? {
        println!(
            "- [{} {:?}] {} ({}, {})",
            news.category.icon(),
            news.severity,
            news.title,
            news.location,
            news.posted_ago
        );
    }
    companion.navigate(Screen::Dashboard)?;

    println!("\nPrice assistant");
    companion.navigate(Screen::Negotiation)?;
    let quote = companion.scan_price(&item).await?;
    print_quote(&quote);
    companion.navigate(Screen::Dashboard)?;

    println!("\nEnquiry assistant");
    companion.navigate(Screen::Chatbot)?;
    for question in ["Where is the nearest bus stop?", "I need emergency help"] {
        let reply = companion.send_chat(question).await?;
        println!("> {question}");
        println!("{}", reply.text);
    }
    companion.navigate(Screen::Dashboard)?;

    println!("\nSolo female mode");
    companion.navigate(Screen::SoloFemale)?;
    let services = companion.set_solo_mode(true)?;
    println!("- {} services available", services.len());
    companion.navigate(Screen::Dashboard)?;

    println!("\nPolice dashboard");
    companion.navigate(Screen::Police)?;
    let overview = companion.police_overview()?;
    println!(
        "- {} tourists tracked, {} high-risk areas, {} open SOS calls, {} auto FIRs",
        overview.total_tourists,
        overview.high_risk_areas,
        overview.active_sos.len(),
        overview.auto_firs.len()
    );
    let verification = companion.search_digital_id(&card.id)?;
    println!(
        "- {} verified: {}",
        verification.digital_id, verification.verified
    );
    companion.navigate(Screen::Dashboard)?;

    println!("\nTrip planner");
    companion.navigate(Screen::TripPlanner)?;
    let start_date = Local::now().date_naive() + Duration::days(7);
    let plan = companion.plan_trip(TripForm {
        origin: "Delhi".to_string(),
        destination: destination.clone(),
        start_date,
        end_date: start_date + Duration::days(2),
        travelers: 1,
    })?;
    println!(
        "- {} -> {} for {} days starting {}",
        plan.origin, plan.destination, plan.days, plan.start_date
    );

    let sos = companion.trigger_sos()?;
    println!("\n{}: {}", sos.title, sos.description);
    print_notifications(&companion);

    Ok(())
}

pub(crate) async fn run_band(args: BandArgs) -> Result<(), AppError> {
    let BandArgs {
        ticks,
        seed,
        interval_ms,
    } = args;

    let settings = BandSettings::from(&SimulationConfig {
        band_interval: std::time::Duration::from_millis(interval_ms.max(1)),
        ..SimulationConfig::default()
    });
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let cancel = CancellationToken::new();
    let (handle, mut events) = SmartBand::new(settings).spawn(rng, cancel.clone());

    let mut readings = 0;
    while readings < ticks {
        let Some(event) = events.recv().await else {
            break;
        };
        match &event {
            BandEvent::HeartRate(reading) => {
                readings += 1;
                println!("heart rate {} bpm ({})", reading.bpm, reading.band.label());
            }
            BandEvent::Battery(reading) => println!("battery {}%", reading.level),
        }
        if let Some(alert) = event.alert() {
            print_notification(alert);
        }
    }

    cancel.cancel();
    if let Ok(band) = handle.await {
        let snapshot = band.snapshot();
        println!(
            "final: {} bpm, battery {}%, connected {}",
            snapshot.heart_rate, snapshot.battery_level, snapshot.connected
        );
    }
    Ok(())
}

pub(crate) fn run_price(item: &str) -> Result<(), AppError> {
    print_quote(&pricing::quote(item));
    Ok(())
}

pub(crate) fn run_chat(message: &str) -> Result<(), AppError> {
    let reply = chat::reply(message);
    println!("{}", reply.text);
    if !reply.suggestions.is_empty() {
        println!("\nTry: {}", reply.suggestions.join(" | "));
    }
    Ok(())
}

fn demo_signup() -> SignupForm {
    SignupForm {
        full_name: "Ananya Das".to_string(),
        email: "ananya@example.com".to_string(),
        phone: "+91 9876500000".to_string(),
        password: "brahmaputra".to_string(),
        confirm_password: "brahmaputra".to_string(),
        id_type: Some("aadhaar".to_string()),
        id_number: Some("XXXX-XXXX-1234".to_string()),
        emergency_name: Some("Rohan Das".to_string()),
        emergency_contact: Some("+91 9876500001".to_string()),
    }
}

fn print_quote(quote: &PriceQuote) {
    println!("{} ({})", quote.item_label, quote.category);
    println!(
        "- Quoted ₹{} | fair ₹{}-₹{} | average ₹{} | markup {}% ({:?})",
        quote.quoted_price,
        quote.fair_range.min,
        quote.fair_range.max,
        quote.average_price,
        quote.markup_percent,
        quote.markup_level
    );
    for tip in &quote.tips {
        println!("  - {tip}");
    }
}

fn print_notifications(companion: &Companion) {
    for notification in companion.drain_notifications() {
        print_notification(&notification);
    }
}

fn print_notification(notification: &Notification) {
    let marker = if notification.is_destructive() { "!" } else { "*" };
    println!("  {marker} {}: {}", notification.title, notification.description);
}
