use crate::catalog::{ActivationModel, ModelRequest, Preprocess};
use crate::envconfig;
use crate::hub::{BuiltModel, Framework, ModelHub, ModelRef};
use crate::stats::{ManifoldStatistics, Pooling, Sampling, StatisticsSuite, Table};
use crate::Result;
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Blocking client for the activation-extraction engine. The engine hosts
/// the actual networks: it constructs models (downloading weights as
/// needed), extracts layer activations and fits the manifold statistics.
/// This side only describes what to build and what to fit.
pub struct Client {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl Client {
    pub fn from_env() -> Result<Self> {
        Self::new(envconfig::engine_host())
    }

    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(envconfig::engine_timeout())
            .build()?;

        Ok(Self { base_url, client })
    }

    fn fit_request(
        &self,
        stimulus_set: &'static str,
        data_dir: Option<&Path>,
        model: ActivationModel,
        pooling: Pooling,
        sampling: Option<Sampling>,
    ) -> RemoteStatistics {
        RemoteStatistics {
            http: self.client.clone(),
            base_url: self.base_url.clone(),
            request: FitRequest {
                stimulus_set,
                identifier: model.identity.id(),
                model: model.model,
                preprocess: model.preprocess,
                pooling,
                data_dir: data_dir.map(|p| p.display().to_string()),
                sampling,
                layers: Vec::new(),
            },
            table: Table::default(),
        }
    }
}

impl ModelHub for Client {
    fn build(&self, request: &ModelRequest) -> Result<BuiltModel> {
        let url = format!("{}/api/models", self.base_url);
        let response = self.client.post(&url).json(request).send()?;

        if !response.status().is_success() {
            bail!("model build failed: {}", response.status());
        }

        let reply: BuildResponse = response.json()?;
        Ok(BuiltModel {
            model: ModelRef(reply.model),
            framework: reply.framework,
        })
    }
}

impl StatisticsSuite for Client {
    fn imagenet(
        &self,
        model: ActivationModel,
        pooling: Pooling,
    ) -> Result<Box<dyn ManifoldStatistics>> {
        Ok(Box::new(self.fit_request("imagenet", None, model, pooling, None)))
    }

    fn imagenet21k(
        &self,
        data_dir: Option<&Path>,
        model: ActivationModel,
        pooling: Pooling,
        sampling: Option<Sampling>,
    ) -> Result<Box<dyn ManifoldStatistics>> {
        Ok(Box::new(self.fit_request("imagenet21k", data_dir, model, pooling, sampling)))
    }

    fn object2vec(
        &self,
        data_dir: Option<&Path>,
        model: ActivationModel,
        pooling: Pooling,
    ) -> Result<Box<dyn ManifoldStatistics>> {
        Ok(Box::new(self.fit_request("object2vec", data_dir, model, pooling, None)))
    }

    fn majajhong2015(
        &self,
        model: ActivationModel,
        pooling: Pooling,
    ) -> Result<Box<dyn ManifoldStatistics>> {
        Ok(Box::new(self.fit_request("majajhong2015", None, model, pooling, None)))
    }
}

#[derive(Deserialize)]
struct BuildResponse {
    model: String,
    framework: Framework,
}

#[derive(Serialize)]
struct FitRequest {
    stimulus_set: &'static str,
    identifier: String,
    model: ModelRef,
    preprocess: Preprocess,
    pooling: Pooling,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sampling: Option<Sampling>,
    layers: Vec<String>,
}

struct RemoteStatistics {
    http: reqwest::blocking::Client,
    base_url: String,
    request: FitRequest,
    table: Table,
}

impl ManifoldStatistics for RemoteStatistics {
    fn fit(&mut self, layers: &[String]) -> Result<()> {
        self.request.layers = layers.to_vec();

        let url = format!("{}/api/manifolds/fit", self.base_url);
        let response = self.http.post(&url).json(&self.request).send()?;

        if !response.status().is_success() {
            bail!(
                "manifold fit failed for {}: {}",
                self.request.identifier,
                response.status()
            );
        }

        self.table = response.json()?;
        Ok(())
    }

    fn table(&self) -> Table {
        self.table.clone()
    }
}
