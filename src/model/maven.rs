//! Maven-style deployer node.

use crate::error::{ConfigError, ProcessingError};
use crate::model::{
    Active, ConfigEntity, EntityCore, EntityKind, Flag, Project, mask_secret,
    merge::{merge_option, merge_ordered_set, merge_text, merge_number},
};
use crate::templates::{Props, TemplateRenderer};
use serde_json::{Map, Value, json};
use std::{fmt, str::FromStr};

/// Connect timeout applied by the built-in defaults layer.
pub const DEFAULT_CONNECT_TIMEOUT: u32 = 20;

/// Read timeout applied by the built-in defaults layer.
pub const DEFAULT_READ_TIMEOUT: u32 = 60;

/// HTTP authorization scheme used against a deployment endpoint.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Authorization {
    None,
    #[default]
    Basic,
    Bearer,
}

impl Authorization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Authorization::None => "NONE",
            Authorization::Basic => "BASIC",
            Authorization::Bearer => "BEARER",
        }
    }
}

impl FromStr for Authorization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Authorization::None),
            "BASIC" => Ok(Authorization::Basic),
            "BEARER" => Ok(Authorization::Bearer),
            _ => Err(ConfigError::InvalidValue {
                field: "authorization".to_string(),
                value: s.to_string(),
                reason: "expected one of none, basic, bearer".to_string(),
            }),
        }
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username and password for a deployment endpoint.
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &mask_secret(self.username.as_deref()))
            .field("password", &mask_secret(self.password.as_deref()))
            .finish()
    }
}

/// A Maven repository endpoint artifacts are deployed to.
///
/// Timeouts use `0` for "unset". The URL is a template rendered against the
/// run's property bag, see [`MavenDeployer::resolved_url`].
#[derive(Clone, Debug, PartialEq)]
pub struct MavenDeployer {
    core: EntityCore,
    pub url: Option<String>,
    pub credentials: Credentials,
    pub authorization: Option<Authorization>,
    pub connect_timeout: u32,
    pub read_timeout: u32,
    pub sign: Flag,
    pub verify_pom: Flag,
    pub apply_maven_central_rules: Flag,
    /// Directories relative to the project, deployed in order
    pub staging_repositories: Vec<String>,
}

impl MavenDeployer {
    /// # Panics
    ///
    /// Panics if `kind` is not a Maven deployer kind.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        assert!(kind.is_maven_deployer(), "{kind} is not a maven deployer");
        Self {
            core: EntityCore::new(kind, name, Active::Never),
            url: None,
            credentials: Credentials::default(),
            authorization: None,
            connect_timeout: 0,
            read_timeout: 0,
            sign: Flag::Unset,
            verify_pom: Flag::Unset,
            apply_maven_central_rules: Flag::Unset,
            staging_repositories: Vec::new(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.credentials.password.as_deref()
    }

    pub fn is_sign(&self) -> bool {
        self.sign.get()
    }

    pub fn is_sign_set(&self) -> bool {
        self.sign.is_set()
    }

    pub fn is_verify_pom(&self) -> bool {
        self.verify_pom.get()
    }

    pub fn is_verify_pom_set(&self) -> bool {
        self.verify_pom.is_set()
    }

    pub fn is_apply_maven_central_rules(&self) -> bool {
        self.apply_maven_central_rules.get()
    }

    pub fn is_apply_maven_central_rules_set(&self) -> bool {
        self.apply_maven_central_rules.is_set()
    }

    /// Maven deployers never accept snapshot versions.
    pub fn snapshot_supported(&self) -> bool {
        false
    }

    /// Configured scheme, `BASIC` when none was configured.
    pub fn resolve_authorization(&self) -> Authorization {
        self.authorization.unwrap_or_default()
    }

    /// Render the URL template.
    ///
    /// The bag is extended with `username`, its `owner` alias and every
    /// extra property before rendering; the result must parse as a URL.
    pub fn resolved_url(
        &self,
        renderer: &dyn TemplateRenderer,
        props: &Props,
    ) -> Result<String, ProcessingError> {
        let template = self.url.as_deref().unwrap_or_default();
        let mut bag = props.clone();
        if let Some(username) = self.username() {
            bag.insert("username".into(), json!(username));
            bag.insert("owner".into(), json!(username));
        }
        for (key, value) in &self.core.extra_properties {
            bag.insert(key.clone(), value.clone());
        }

        let rendered = renderer.render(self.name(), template, &bag)?;
        url::Url::parse(&rendered).map_err(|source| ProcessingError::InvalidUrl {
            url: rendered.clone(),
            source,
        })?;
        Ok(rendered)
    }
}

impl ConfigEntity for MavenDeployer {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn merge(&mut self, source: &Self) {
        self.core.merge(&source.core);
        merge_text(&mut self.url, &source.url);
        merge_text(&mut self.credentials.username, &source.credentials.username);
        merge_text(&mut self.credentials.password, &source.credentials.password);
        merge_option(&mut self.authorization, &source.authorization);
        merge_number(&mut self.connect_timeout, source.connect_timeout);
        merge_number(&mut self.read_timeout, source.read_timeout);
        self.sign.merge(source.sign);
        self.verify_pom.merge(source.verify_pom);
        self.apply_maven_central_rules
            .merge(source.apply_maven_central_rules);
        merge_ordered_set(&mut self.staging_repositories, &source.staging_repositories);
    }

    fn is_set(&self) -> bool {
        self.core.is_set()
            || self.url.is_some()
            || self.credentials != Credentials::default()
            || self.authorization.is_some()
            || self.connect_timeout != 0
            || self.read_timeout != 0
            || self.sign.is_set()
            || self.verify_pom.is_set()
            || self.apply_maven_central_rules.is_set()
            || !self.staging_repositories.is_empty()
    }

    fn as_map(&self, full: bool, project: &Project) -> Map<String, Value> {
        if !full && !self.is_enabled(project) {
            return Map::new();
        }

        let mut props = self.core.base_map(project);
        props.insert("type".into(), json!(self.kind().as_str()));
        props.insert("url".into(), json!(self.url));
        props.insert("username".into(), mask_secret(self.username()));
        props.insert("password".into(), mask_secret(self.password()));
        props.insert(
            "authorization".into(),
            json!(self.resolve_authorization().as_str()),
        );
        props.insert("connectTimeout".into(), json!(self.connect_timeout));
        props.insert("readTimeout".into(), json!(self.read_timeout));
        props.insert("sign".into(), json!(self.is_sign()));
        props.insert("verifyPom".into(), json!(self.is_verify_pom()));
        props.insert(
            "applyMavenCentralRules".into(),
            json!(self.is_apply_maven_central_rules()),
        );
        props.insert(
            "stagingRepositories".into(),
            json!(self.staging_repositories),
        );
        props.insert(
            "extraProperties".into(),
            Value::Object(self.core.extra_properties.clone()),
        );

        let mut map = Map::new();
        map.insert(self.name().to_string(), Value::Object(props));
        map
    }
}
