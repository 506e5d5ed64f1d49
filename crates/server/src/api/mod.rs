use form_core::{apply, render, submit, FormEvent, SubmitOutcome};
use shared::{
    domain::FormValues,
    error::{ApiError, ErrorCode},
    protocol::{SessionId, SessionResponse, SubmitRejected, SubmitResponse},
};
use tracing::info;

use crate::sessions::{FormSession, SessionStore};

#[derive(Clone)]
pub struct ApiContext {
    pub(crate) sessions: SessionStore,
    pub display_precision: u32,
    pub calendar_year: Option<i32>,
}

#[derive(Debug)]
pub enum SubmitFailure {
    Api(ApiError),
    Rejected(SubmitRejected),
}

impl From<ApiError> for SubmitFailure {
    fn from(value: ApiError) -> Self {
        SubmitFailure::Api(value)
    }
}

impl ApiContext {
    pub fn new(max_sessions: usize, display_precision: u32, calendar_year: Option<i32>) -> Self {
        Self {
            sessions: SessionStore::new(max_sessions),
            display_precision,
            calendar_year,
        }
    }

    fn year(&self) -> i32 {
        self.calendar_year.unwrap_or_else(form_core::current_year)
    }

    fn session_response(&self, id: SessionId, session: &FormSession, rebuild: bool) -> SessionResponse {
        SessionResponse {
            session_id: id,
            state: session.state,
            rebuild,
            view: render(
                session.state,
                &session.values,
                self.year(),
                self.display_precision,
            ),
        }
    }
}

pub async fn open_session(ctx: &ApiContext) -> SessionResponse {
    let (id, session) = ctx.sessions.create().await;
    info!(session_id = %id, "form session opened");
    ctx.session_response(id, &session, false)
}

pub async fn view_session(ctx: &ApiContext, id: SessionId) -> Result<SessionResponse, ApiError> {
    ctx.sessions
        .update(id, |session| ctx.session_response(id, session, false))
        .await
        .ok_or_else(|| session_not_found(id))
}

pub async fn add_table(ctx: &ApiContext, id: SessionId) -> Result<SessionResponse, ApiError> {
    grow(ctx, id, FormEvent::AddTable).await
}

pub async fn add_year(ctx: &ApiContext, id: SessionId) -> Result<SessionResponse, ApiError> {
    grow(ctx, id, FormEvent::AddYear).await
}

async fn grow(ctx: &ApiContext, id: SessionId, event: FormEvent) -> Result<SessionResponse, ApiError> {
    ctx.sessions
        .update(id, |session| {
            let transition = apply(session.state, event);
            session.state = transition.state;
            info!(
                session_id = %id,
                ?event,
                table_count = session.state.table_count,
                row_count = session.state.row_count,
                "form grown"
            );
            ctx.session_response(id, session, transition.rebuild)
        })
        .await
        .ok_or_else(|| session_not_found(id))
}

pub async fn submit_values(
    ctx: &ApiContext,
    id: SessionId,
    values: FormValues,
) -> Result<SubmitResponse, SubmitFailure> {
    let year = ctx.year();
    ctx.sessions
        .update(id, |session| {
            match submit(session.state, values, year) {
                SubmitOutcome::Accepted { transition, values } => {
                    session.state = transition.state;
                    session.values = values;
                    Ok(SubmitResponse {
                        session_id: id,
                        state: session.state,
                        status: transition.status.unwrap_or_default().to_string(),
                        rebuild: transition.rebuild,
                        values: session.values.clone(),
                        view: render(session.state, &session.values, year, ctx.display_precision),
                    })
                }
                SubmitOutcome::Rejected(errors) => Err(SubmitFailure::Rejected(SubmitRejected {
                    session_id: id,
                    errors: errors.messages(),
                })),
            }
        })
        .await
        .ok_or_else(|| session_not_found(id))?
}

pub async fn close_session(ctx: &ApiContext, id: SessionId) -> Result<(), ApiError> {
    if ctx.sessions.remove(id).await {
        info!(session_id = %id, "form session closed");
        Ok(())
    } else {
        Err(session_not_found(id))
    }
}

fn session_not_found(id: SessionId) -> ApiError {
    ApiError::new(ErrorCode::NotFound, format!("form session {id} not found"))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
