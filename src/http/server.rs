use log::info;
use rouille::{Request, Response};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    analysis::{
        Filters, aggregate, filter::GenreFilter, filter::filtered_view, summary_statistics,
    },
    config::HttpConfig,
    domain::{
        record::{Catalog, TrackRecord},
        selection::{Endpoint, YearRange},
    },
    http::error::ApiError,
};

/// Serves the chart view-models as JSON to the rendering layer.
///
/// The catalog is write-once/read-many, so the handlers share it
/// behind a plain `Arc` with no locking.
pub struct HttpServer {
    catalog: Arc<Catalog>,
    pub config: HttpConfig,
}

impl HttpServer {
    pub fn new(catalog: Catalog, config: HttpConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let response = rouille::router!(request,
            (GET) (/summary) => {
                self.handle_view(request, |view| summary_statistics(view))
            },

            (GET) (/genres) => {
                Response::json(&self.catalog.distinct_sorted_genres())
            },

            (GET) (/charts/genre_counts) => {
                self.handle_view(request, |view| aggregate::genre_counts(view))
            },

            (GET) (/charts/duration_histogram) => {
                self.handle_view(request, |view| aggregate::duration_histogram(view))
            },

            (GET) (/charts/yearly_duration) => {
                self.handle_view(request, |view| aggregate::yearly_average_duration(view))
            },

            (GET) (/charts/top_artists) => {
                self.handle_view(request, |view| aggregate::top_artists(view))
            },

            (GET) (/charts/top_tracks) => {
                self.handle_view(request, |view| aggregate::top_tracks(view))
            },

            (GET) (/charts/genre_trend) => {
                self.handle_view(request, |view| aggregate::genre_popularity_trend(view))
            },

            _ => Response::empty_404()
        );

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.url());
    }

    /// Filters the catalog per the query parameters, then serializes
    /// whatever the aggregator derives from the view.
    fn handle_view<T, F>(&self, request: &Request, aggregate: F) -> Response
    where
        T: Serialize,
        F: FnOnce(&[&TrackRecord]) -> T,
    {
        let filters = match Self::parse_filters(request) {
            Ok(filters) => filters,
            Err(e) => return e.into_response(),
        };

        let view = filtered_view(&self.catalog, &filters.genre, filters.range);
        Response::json(&aggregate(&view))
    }

    /// Reads `genre` / `from` / `to` query parameters into filter
    /// state. Year bounds go through the same clamp rules as the
    /// slider, so a crossed pair normalizes instead of erroring.
    fn parse_filters(request: &Request) -> Result<Filters, ApiError> {
        let genre = request
            .get_param("genre")
            .unwrap_or_else(|| "All".to_string());

        let mut range = YearRange::full();
        if let Some(raw) = request.get_param("from") {
            let value: f64 = raw
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("invalid 'from' year: {raw}")))?;
            range = range.set(Endpoint::Start, value);
        }
        if let Some(raw) = request.get_param("to") {
            let value: f64 = raw
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("invalid 'to' year: {raw}")))?;
            range = range.set(Endpoint::End, value);
        }

        Ok(Filters {
            genre: GenreFilter::from_selector(&genre),
            range,
        })
    }
}
