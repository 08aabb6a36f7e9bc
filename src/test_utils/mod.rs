#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod fs;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod state;

pub(crate) use form::{
    assert_form_field_error, assert_form_file_input, assert_form_input,
    assert_form_input_with_value, assert_form_submit_button_with_text, assert_form_target,
    must_get_form,
};
pub(crate) use fs::{JPEG_BYTES, PNG_BYTES, temp_dir};
pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::{assert_content_type, assert_redirect, assert_status_ok};
pub(crate) use state::get_test_app_state;
