//! GET and POST `/{arena}/{num}`: the score sheet for one match.

use std::collections::HashMap;

use axum::{
  Form, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Redirect, Response},
};
use scorer_core::{competition::Competition, game::Match, repo::SharedRepository};
use scorer_form::{FormFields, FormValue};
use serde::{Deserialize, Serialize};

use super::find_match;
use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  workflow::{self, Phase, UpdateContext, UpdateError},
};

/// The sheet as shown to the operator, or echoed back after a failed submit.
#[derive(Debug, Serialize)]
pub struct ScoreSheet {
  /// `None` only when the compstate failed to load before the match could
  /// be resolved.
  #[serde(rename = "match")]
  pub m:     Option<Match>,
  pub form:  FormFields,
  /// The previous submit for this match succeeded.
  pub done:  bool,
  pub error: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phase: Option<Phase>,
}

#[derive(Deserialize)]
pub struct ShowQuery {
  #[serde(default)]
  done: bool,
}

pub async fn show<R, C>(
  _auth: Authenticated,
  State(state): State<AppState<R, C>>,
  Path((arena, num)): Path<(String, String)>,
  Query(query): Query<ShowQuery>,
) -> Result<Json<ScoreSheet>, Error>
where
  R: SharedRepository + Clone + 'static,
  C: Competition + Clone + 'static,
{
  let comp = state.competition.load().await?;
  let m = find_match(&comp, &arena, &num)?;

  let form = match state.store.read(&m).await {
    Ok(record) => scorer_form::encode_for_edit(&record, &state.config.game),
    Err(scorer_compstate::Error::NotFound(_)) => scorer_form::blank_sheet(&m),
    Err(e) => return Err(e.into()),
  };

  Ok(Json(ScoreSheet { m: Some(m), form, done: query.done, error: None, phase: None }))
}

pub async fn submit<R, C>(
  _auth: Authenticated,
  State(state): State<AppState<R, C>>,
  Path((arena, num)): Path<(String, String)>,
  Form(mut fields): Form<HashMap<String, String>>,
) -> Result<Response, Error>
where
  R: SharedRepository + Clone + 'static,
  C: Competition + Clone + 'static,
{
  let force = fields.remove("force").is_some();
  let form: FormFields = fields.into_iter().map(|(k, v)| (k, FormValue::from(v))).collect();

  let comp = match state.competition.load().await {
    Ok(comp) => comp,
    Err(e) => {
      tracing::error!(error = %e, "compstate failed to load before update");
      let sheet = ScoreSheet {
        m: None,
        form,
        done: false,
        error: Some(e.to_string()),
        phase: Some(Phase::Idle),
      };
      return Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(sheet)).into_response());
    }
  };
  let m = find_match(&comp, &arena, &num)?;

  let outcome = {
    let _guard = state.working_copy.lock().await;
    let ctx = UpdateContext {
      store:       &state.store,
      repo:        state.repo.as_ref(),
      competition: state.competition.as_ref(),
      rules:       &state.config.game,
    };
    workflow::update_score(&ctx, &m, &form, force).await
  };

  match outcome {
    Ok(_) => Ok(Redirect::to(&format!("/{}/{}?done=true", m.arena, m.num)).into_response()),
    Err(failed) => {
      let status = status_for(&failed.error);
      let sheet = ScoreSheet {
        m: Some(m),
        form,
        done: false,
        error: Some(failed.to_string()),
        phase: Some(failed.phase),
      };
      Ok((status, Json(sheet)).into_response())
    }
  }
}

fn status_for(error: &UpdateError) -> StatusCode {
  match error {
    UpdateError::InvalidInput(_) | UpdateError::ValidationFailure { .. } => {
      StatusCode::UNPROCESSABLE_ENTITY
    }
    UpdateError::Sync(_) => StatusCode::CONFLICT,
    UpdateError::Load(_) | UpdateError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}
