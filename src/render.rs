use owo_colors::OwoColorize;

use crate::form::{FormController, FormState};

pub const TITLE: &str = "회의실 에이전트";
pub const EXAMPLE_HINT: &str = "예: 에펠탑 17층 1702-A 오늘 15:00~16:00 비었어?";
pub const PLACEHOLDER: &str = "질문을 입력하세요";
pub const SUBMIT_LABEL: &str = "보내기";
pub const LOADING_LABEL: &str = "처리 중…";

pub fn button_label(loading: bool) -> &'static str {
    if loading {
        LOADING_LABEL
    } else {
        SUBMIT_LABEL
    }
}

pub fn render_header(colored: bool) -> String {
    if colored {
        format!("{}\n{}\n", TITLE.bold(), EXAMPLE_HINT.dimmed())
    } else {
        format!("{TITLE}\n{EXAMPLE_HINT}\n")
    }
}

pub fn render_prompt(form: &FormController) -> String {
    let shown = if form.input().is_empty() {
        PLACEHOLDER
    } else {
        form.input()
    };
    format!("> {shown}  [{}]", button_label(form.is_loading()))
}

pub fn render_state(state: &FormState, colored: bool) -> String {
    match state {
        FormState::Idle => String::new(),
        FormState::Loading => LOADING_LABEL.to_string(),
        FormState::Failed(message) if colored => message.red().to_string(),
        FormState::Failed(message) => message.clone(),
        FormState::Answered(answer) => answer.clone(),
    }
}
