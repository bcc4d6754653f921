//! HTTP endpoints.
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/holidays/{year}/{countryCode}` | GET | Full calendar as JSON |
//! | `/isHoliday/{date}/{countryCode}` | GET | Single-date check (text) |
//! | `/areTheseHolidays/{countryCode}/{dates}` | GET | Comma-separated batch |
//! | `/areTheseHolidaysJSON/{countryCode}` | GET, POST | JSON batch |
//! | `/health` | GET | Liveness check |
//! | `/metrics` | GET | Prometheus metrics |

pub mod routes;
pub mod state;

pub use routes::{
    create_router, create_router_with_body_limit, create_router_with_observability, ApiError,
    DEFAULT_BODY_LIMIT,
};
pub use state::{AppState, StateError};
