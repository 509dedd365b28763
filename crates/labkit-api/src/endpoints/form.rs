// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Browser form: 30 numeric inputs, a Predict button, the prediction line and
//! the accuracy measured at startup.

use std::collections::HashMap;
use std::fmt::Write as _;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Form;

use labkit_classifier::{feature_label, Prediction, TrainedModel};

use crate::common::{ApiError, ApiResult};
use crate::transports::http::server::ApiState;

const PAGE_TITLE: &str = "Breast Cancer Prediction App";
const SUBHEADER: &str = "Enter tumor characteristics:";
const GROUP_LEGENDS: [&str; 3] = ["Mean values", "Standard error", "Worst values"];

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;color:#262730}\
fieldset{display:grid;grid-template-columns:repeat(5,1fr);gap:.6em;margin-bottom:1em}\
label{display:flex;flex-direction:column;font-size:.85em}\
input{padding:.3em}button{padding:.5em 2em;font-size:1em}\
.result{font-size:1.2em;margin:1em 0}";

/// `GET /`
pub async fn get_form(State(state): State<ApiState>) -> Html<String> {
    let values = vec![0.0; state.model.n_features()];
    Html(render_page(&state.model, &values, None))
}

/// `POST /predict` - urlencoded form with one field per feature column.
/// Absent fields count as 0.0; fields that are not numbers are rejected.
pub async fn post_form(
    State(state): State<ApiState>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> ApiResult<Html<String>> {
    let Form(fields) =
        form.map_err(|rejection| ApiError::invalid_input(format!("Invalid form: {}", rejection.body_text())))?;

    let values = parse_fields(state.model.feature_names(), &fields)?;
    let prediction = state.model.predict_slice(&values)?;
    tracing::debug!(target: "labkit_api", "Form prediction: {}", prediction);
    Ok(Html(render_page(&state.model, &values, Some(&prediction))))
}

fn parse_fields(names: &[String], fields: &HashMap<String, String>) -> ApiResult<Vec<f64>> {
    names
        .iter()
        .map(|name| match fields.get(name) {
            None => Ok(0.0),
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
                ApiError::invalid_input(format!(
                    "Field '{}' must be a number, got '{}'",
                    name,
                    raw.trim()
                ))
            }),
        })
        .collect()
}

pub fn render_page(model: &TrainedModel, values: &[f64], prediction: Option<&Prediction>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{PAGE_TITLE}</h1>\n<h3>{SUBHEADER}</h3>\n<form method=\"post\" action=\"/predict\">\n"
    );

    let names = model.feature_names();
    let per_group = names.len().div_ceil(GROUP_LEGENDS.len()).max(1);
    for (group, chunk) in names.chunks(per_group).enumerate() {
        let legend = GROUP_LEGENDS.get(group).copied().unwrap_or("Features");
        let _ = writeln!(html, "<fieldset>\n<legend>{} ({})</legend>", legend, group + 1);
        for (offset, name) in chunk.iter().enumerate() {
            let value = values.get(group * per_group + offset).copied().unwrap_or(0.0);
            let _ = writeln!(
                html,
                "<label>{label}<input type=\"number\" step=\"any\" name=\"{name}\" value=\"{value:?}\"></label>",
                label = feature_label(name),
            );
        }
        html.push_str("</fieldset>\n");
    }
    html.push_str("<button type=\"submit\">Predict</button>\n</form>\n");

    if let Some(p) = prediction {
        let emoji = p.diagnosis.emoji();
        let _ = writeln!(
            html,
            "<p class=\"result\">{emoji} The tumor is predicted to be: <strong>{}</strong> with <strong>{:.2}%</strong> confidence. {emoji}</p>",
            p.diagnosis.label(),
            p.confidence,
        );
    }
    let _ = writeln!(
        html,
        "<p>Accuracy of the model: {:.2}%</p>\n</body>\n</html>",
        model.evaluation().accuracy_percent()
    );
    html
}
