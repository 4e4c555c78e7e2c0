// Route exports
pub mod plan;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(plan::configure);
}
