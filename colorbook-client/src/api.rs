use colorbook::{ColorPalette, ProgressRecord, StoreError, SvgImage, UserProfile};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Blocking client for the coloring backend's REST resources. One instance
/// per base URL; `reqwest` pools connections underneath.
pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            base: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    // --- images ---

    pub fn images(&self) -> Result<Vec<SvgImage>, StoreError> {
        self.get_json(&self.url("/images"), &[])
    }

    pub fn upload_image(&self, image: &SvgImage) -> Result<(), StoreError> {
        self.post_json::<_, serde_json::Value>(&self.url("/images"), image)?;
        Ok(())
    }

    pub fn delete_image(&self, id: &str) -> Result<(), StoreError> {
        self.delete(&self.url(&format!("/images/{id}")))
    }

    // --- palettes ---

    pub fn palettes(&self) -> Result<Vec<ColorPalette>, StoreError> {
        self.get_json(&self.url("/palettes"), &[])
    }

    pub fn create_palette(&self, palette: &ColorPalette) -> Result<(), StoreError> {
        self.post_json::<_, serde_json::Value>(&self.url("/palettes"), palette)?;
        Ok(())
    }

    pub fn delete_palette(&self, id: &str) -> Result<(), StoreError> {
        self.delete(&self.url(&format!("/palettes/{id}")))
    }

    // --- progress ---

    pub fn progress_for(&self, user_id: &str, svg_id: &str) -> Result<ProgressRecord, StoreError> {
        self.get_json(&self.url(&format!("/progress/user/{user_id}/svg/{svg_id}")), &[])
    }

    pub fn list_progress(
        &self,
        user_id: &str,
        svg_id: Option<&str>,
    ) -> Result<Vec<ProgressRecord>, StoreError> {
        let mut query = vec![("userId", user_id)];
        if let Some(svg_id) = svg_id {
            query.push(("svgId", svg_id));
        }
        self.get_json(&self.url("/progress"), &query)
    }

    /// POST a new record; the backend answers with the stored record
    /// including its assigned id.
    pub fn create_progress(&self, record: &ProgressRecord) -> Result<String, StoreError> {
        let stored: ProgressRecord = self.post_json(&self.url("/progress"), record)?;
        stored
            .id
            .ok_or_else(|| StoreError::Decode("create response carried no id".into()))
    }

    pub fn update_progress(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        let id = record.id.as_deref().ok_or(StoreError::NotFound)?;
        let resp = self
            .http
            .put(self.url(&format!("/progress/{id}")))
            .json(record)
            .send()
            .map_err(transport)?;
        expect_success(resp).map(|_| ())
    }

    pub fn delete_progress(&self, id: &str) -> Result<(), StoreError> {
        self.delete(&self.url(&format!("/progress/{id}")))
    }

    // --- users ---

    pub fn user(&self, id: &str) -> Result<UserProfile, StoreError> {
        self.get_json(&self.url(&format!("/users/{id}")), &[])
    }

    pub fn create_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.post_json::<_, serde_json::Value>(&self.url("/users"), profile)?;
        Ok(())
    }

    /// Profile lookup keyed by the identity provider's subject id,
    /// registering the profile on first sight.
    pub fn get_or_create_user(&self, profile: &UserProfile) -> Result<UserProfile, StoreError> {
        match self.user(&profile.id) {
            Ok(existing) => Ok(existing),
            Err(StoreError::NotFound) => {
                self.create_user(profile)?;
                Ok(profile.clone())
            }
            Err(err) => Err(err),
        }
    }

    // --- plumbing ---

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, StoreError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .map_err(transport)?;
        decode(expect_success(resp)?)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let resp = self.http.post(url).json(body).send().map_err(transport)?;
        decode(expect_success(resp)?)
    }

    fn delete(&self, url: &str) -> Result<(), StoreError> {
        let resp = self.http.delete(url).send().map_err(transport)?;
        expect_success(resp).map(|_| ())
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Network(err.to_string())
}

fn expect_success(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }
    if !status.is_success() {
        return Err(StoreError::Http {
            status: status.as_u16(),
        });
    }
    Ok(resp)
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, StoreError> {
    resp.json().map_err(|e| StoreError::Decode(e.to_string()))
}
