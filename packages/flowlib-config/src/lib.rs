mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Data, Pagination, Search, SearchWeights, Security, Service};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	let http_addr = parse_bind("service.http_bind", &cfg.service.http_bind)?;
	let admin_addr = parse_bind("service.admin_bind", &cfg.service.admin_bind)?;

	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.http_bind must be a loopback address when security.bind_localhost_only is true."
				.to_string(),
		});
	}
	if !admin_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.admin_bind must be a loopback address.".to_string(),
		});
	}
	if cfg.data.dir.as_os_str().is_empty() {
		return Err(Error::Validation { message: "data.dir must be non-empty.".to_string() });
	}

	for (label, value) in [
		("data.index_file", &cfg.data.index_file),
		("data.meta_file", &cfg.data.meta_file),
		("data.categories_file", &cfg.data.categories_file),
		("data.integrations_file", &cfg.data.integrations_file),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.data.load_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "data.load_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.threshold.is_finite() {
		return Err(Error::Validation {
			message: "search.threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.threshold) {
		return Err(Error::Validation {
			message: "search.threshold must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.search.min_match_chars == 0 {
		return Err(Error::Validation {
			message: "search.min_match_chars must be greater than zero.".to_string(),
		});
	}

	let weights = &cfg.search.weights;

	for (label, weight) in [
		("search.weights.name", weights.name),
		("search.weights.description", weights.description),
		("search.weights.integrations", weights.integrations),
		("search.weights.category", weights.category),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if weight <= 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if !(weights.name > weights.description
		&& weights.description > weights.integrations
		&& weights.integrations > weights.category)
	{
		return Err(Error::Validation {
			message: "search.weights must be strictly ordered name > description > integrations > category."
				.to_string(),
		});
	}
	if cfg.pagination.default_page_size == 0 {
		return Err(Error::Validation {
			message: "pagination.default_page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.pagination.default_page_size > cfg.pagination.max_page_size {
		return Err(Error::Validation {
			message: "pagination.default_page_size must not exceed pagination.max_page_size."
				.to_string(),
		});
	}

	Ok(())
}

fn parse_bind(label: &str, raw: &str) -> Result<SocketAddr> {
	raw.trim().parse().map_err(|err| Error::Validation {
		message: format!("{label} must be a valid socket address: {err}"),
	})
}

fn normalize(cfg: &mut Config) {
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();
	cfg.service.admin_bind = cfg.service.admin_bind.trim().to_string();

	if let Some(token) = cfg.security.revalidate_token.as_mut() {
		*token = token.trim().to_string();
	}
	if cfg.security.revalidate_token.as_deref().map(str::is_empty).unwrap_or(false) {
		cfg.security.revalidate_token = None;
	}
}
