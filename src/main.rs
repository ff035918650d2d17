use folio_contact::{ContactApplication, SiteProfile};
use tracing::error;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let profile = match SiteProfile::load() {
        Ok(profile) => profile,
        Err(site_error) => {
            error!(error = %site_error, "failed to load site profile");
            std::process::exit(1);
        }
    };

    ContactApplication::new(profile).run();
}
