use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::{bounds::FRANCE, coverage::Resolver, error::CoverageError, geocode::Geocoder};

#[derive(Debug, Deserialize)]
struct CoverageQuery {
    address: Option<String>,
}

#[get("/coverage")]
pub async fn coverage(
    query: web::Query<CoverageQuery>,
    resolver: web::Data<Resolver>,
    geocoder: web::Data<Geocoder>,
) -> Result<HttpResponse, CoverageError> {
    let address = query
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(CoverageError::EmptyAddress)?;

    let point = geocoder.geocode(address).await?;
    let point = FRANCE.validate(point)?;
    let report = resolver.resolve(point)?;

    Ok(HttpResponse::Ok().json(report))
}
