//! Trip searches: flights and hotels side by side, then a model recommendation.

use anyhow::Context;
use chrono::NaiveDate;
use serde_json::Value;
use serp_jobs::{blocking, FlightQuery, HotelQuery, JobBackend, JobPoller};

use crate::{prompt, ChatMessage, Completion, Conversation};

const TRAVEL_PROMPT: &str = include_str!("./prompts/travel_0.txt");
const TRIP_CONTEXT_PROMPT: &str = include_str!("./prompts/trip_context_0.txt");

#[derive(Debug, Clone)]
pub struct TripRequest {
    /// Encoded Google Flights search for the outbound and return legs
    pub flight_tfs: String,
    pub destination: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub travelers: u32,
    pub currency: String,
}

impl TripRequest {
    pub fn flight_query(&self) -> FlightQuery {
        let mut query = FlightQuery::new(&self.flight_tfs);
        query.currency = self.currency.clone();
        query
    }

    pub fn hotel_query(&self) -> HotelQuery {
        let mut query = HotelQuery::new(&self.destination)
            .with_dates(self.check_in, self.check_out)
            .with_occupancy(self.travelers.to_string());
        query.currency = self.currency.clone();
        query
    }
}

/// Each side is `None` when its search failed or timed out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TravelResults {
    pub flights: Option<Value>,
    pub hotels: Option<Value>,
}

/// Runs both searches concurrently and waits for both.
#[tracing::instrument(skip_all, fields(destination = %request.destination))]
pub async fn search_travel_options<B>(poller: &JobPoller<B>, request: &TripRequest) -> TravelResults
where
    B: JobBackend + Sync,
{
    let flight_query = request.flight_query();
    let hotel_query = request.hotel_query();

    let (flights, hotels) = futures::join!(
        poller.search_flights(&flight_query),
        poller.search_hotels(&hotel_query)
    );
    log_results(&flights, &hotels);

    TravelResults { flights, hotels }
}

/// Same as [`search_travel_options`], with each search parked on its own thread.
///
/// The searches get a dedicated two-thread pool, so they overlap even when
/// the global pool has a single worker.
#[tracing::instrument(skip_all, fields(destination = %request.destination))]
pub fn search_travel_options_blocking<B>(
    poller: &blocking::JobPoller<B>,
    request: &TripRequest,
) -> anyhow::Result<TravelResults>
where
    B: blocking::BlockingJobBackend + Sync,
{
    let flight_query = request.flight_query();
    let hotel_query = request.hotel_query();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .thread_name(|i| format!("travel-search-{i}"))
        .build()
        .context("Failed to start travel search threads")?;

    let (flights, hotels) = pool.install(|| {
        rayon::join(
            || poller.search_flights(&flight_query),
            || poller.search_hotels(&hotel_query),
        )
    });
    log_results(&flights, &hotels);

    Ok(TravelResults { flights, hotels })
}

fn log_results(flights: &Option<Value>, hotels: &Option<Value>) {
    tracing::info!(
        flights = flights.is_some(),
        hotels = hotels.is_some(),
        "Travel searches finished"
    );
}

fn describe(result: &Option<Value>) -> String {
    match result {
        Some(value) => value.to_string(),
        None => "No results available".to_string(),
    }
}

/// Asks the model for a summary of `results` and the options that best fit
/// `requirements`. Failures come back as a readable message.
#[tracing::instrument(skip(completion, results))]
pub async fn recommend<C: Completion>(
    completion: &C,
    results: &TravelResults,
    requirements: &str,
) -> String {
    let hotels = describe(&results.hotels);
    let flights = describe(&results.flights);
    let prompt = prompt::fill(
        TRAVEL_PROMPT,
        &[
            ("hotels", hotels.as_str()),
            ("flights", flights.as_str()),
            ("requirements", requirements),
        ],
    );

    match completion.complete(&[ChatMessage::user(prompt)]).await {
        Ok(recommendation) => recommendation,
        Err(e) => {
            tracing::error!(error = %e, model = completion.model(), "Failed to get recommendation");
            format!("Error while generating recommendation: {e}")
        }
    }
}

/// Starts a follow-up chat about the trip. The model sees the request,
/// both search results and `requirements` before the first question.
pub fn trip_conversation(
    request: &TripRequest,
    results: &TravelResults,
    requirements: &str,
) -> Conversation {
    let check_in = request.check_in.to_string();
    let check_out = request.check_out.to_string();
    let travelers = request.travelers.to_string();
    let flights = describe(&results.flights);
    let hotels = describe(&results.hotels);

    Conversation::with_context(prompt::fill(
        TRIP_CONTEXT_PROMPT,
        &[
            ("destination", request.destination.as_str()),
            ("check_in", check_in.as_str()),
            ("check_out", check_out.as_str()),
            ("travelers", travelers.as_str()),
            ("flights", flights.as_str()),
            ("hotels", hotels.as_str()),
            ("requirements", requirements),
        ],
    ))
}
