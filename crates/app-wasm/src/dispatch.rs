//! Applying UI messages to the session
//!
//! Kept free of browser APIs so the message handling runs in native tests.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use erasure_inference::{SubmissionTicket, SubmitError};
use erasure_ipc::{
    CoreToUi, GeometryInfo, ImageCommand, MaskCommand, PointerEvent, SubmissionRequest, UiToCore,
};
use erasure_session::{Session, SessionError};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use tracing::{debug, warn};

/// What handling one message produced
#[derive(Debug, Default)]
pub struct Outcome {
    /// Messages to post back to the UI, in order
    pub replies: Vec<CoreToUi>,
    /// Request to send; the caller performs the exchange and hands the
    /// ticket back to [`handle_completion`]
    pub submit: Option<(SubmissionTicket, SubmissionRequest)>,
}

impl Outcome {
    fn state(mut self, session: &Session) -> Self {
        self.replies.push(CoreToUi::StateChanged(session.snapshot()));
        self
    }

    fn frame(mut self, session: &Session) -> Self {
        if let Some(frame) = frame_message(session) {
            self.replies.push(frame);
        }
        self
    }

    fn error(mut self, code: &str, message: impl Into<String>) -> Self {
        self.replies.push(CoreToUi::Error {
            code: code.to_string(),
            message: message.into(),
        });
        self
    }

    fn session_error(self, err: &SessionError) -> Self {
        warn!("{err}");
        self.error(err.code(), err.to_string())
    }
}

/// Apply one message.
///
/// Pointer moves only change the live canvas, which the host draws with
/// `render_to_canvas`; they produce no replies.
pub fn handle_message(session: &mut Session, message: UiToCore) -> Outcome {
    let outcome = Outcome::default();
    match message {
        UiToCore::Configure(settings) => {
            session.configure(settings);
            outcome.state(session)
        }
        UiToCore::ResizeViewport(size) => {
            session.resize_viewport(size.width, size.height);
            outcome.state(session).frame(session)
        }
        UiToCore::Wizard(command) => {
            session.handle_wizard(command);
            outcome.state(session).frame(session)
        }
        UiToCore::Image(ImageCommand::Load { data }) => match decode_upload(&data) {
            Ok(bytes) => match session.load_image(bytes) {
                Ok(()) => outcome.state(session).frame(session),
                Err(err) => outcome.session_error(&err),
            },
            Err(message) => outcome.error("decode_failed", message),
        },
        UiToCore::Image(ImageCommand::Remove) => {
            session.remove_image();
            outcome.state(session)
        }
        UiToCore::Mask(MaskCommand::Pointer(event @ PointerEvent::Move { .. })) => {
            session.handle_mask(MaskCommand::Pointer(event));
            outcome
        }
        UiToCore::Mask(command) => {
            session.handle_mask(command);
            outcome.state(session).frame(session)
        }
        UiToCore::Submit => match session.begin_submission() {
            Ok(submission) => Outcome {
                submit: Some(submission),
                ..outcome
            }
            .state(session),
            Err(err) => outcome.session_error(&err).state(session),
        },
        UiToCore::Refresh => outcome.state(session).frame(session),
    }
}

/// Apply the exchange outcome and report it.
///
/// An outcome for a superseded ticket produces no replies.
pub fn handle_completion(
    session: &mut Session,
    ticket: SubmissionTicket,
    result: Result<erasure_ipc::SubmissionResponse, SubmitError>,
) -> Outcome {
    let outcome = Outcome::default();
    let outcome = match session.complete_submission(ticket, result) {
        Ok(false) => {
            debug!("Submission {ticket:?} was superseded; nothing to report");
            return outcome;
        }
        Ok(true) => match session.image().map(|image| png_data_url(image.preview())) {
            Some(Ok(png_data_url)) => {
                let mut outcome = outcome;
                outcome.replies.push(CoreToUi::ResultReady { png_data_url });
                outcome
            }
            Some(Err(err)) => outcome.error("encode_failed", err.to_string()),
            None => outcome,
        },
        Err(err) => outcome.session_error(&err),
    };
    outcome.state(session).frame(session)
}

/// Uploads arrive as base64, optionally wrapped in a data URL
fn decode_upload(data: &str) -> Result<Vec<u8>, String> {
    let data = data.trim();
    let encoded = match data.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, payload)| payload),
        None => data,
    };
    STANDARD
        .decode(encoded)
        .map_err(|e| format!("upload is not valid base64: {e}"))
}

pub fn png_data_url(image: &RgbaImage) -> Result<String, image::ImageError> {
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png)?;
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png.into_inner())
    ))
}

fn frame_message(session: &Session) -> Option<CoreToUi> {
    let geometry = session.geometry()?;
    let frame = session.render_frame()?;
    match png_data_url(&frame) {
        Ok(png_data_url) => Some(CoreToUi::Frame {
            geometry: GeometryInfo {
                scale: geometry.scale,
                width: frame.width(),
                height: frame.height(),
                offset_x: geometry.offset_x,
                offset_y: geometry.offset_y,
            },
            png_data_url,
        }),
        Err(err) => {
            debug!("Skipping frame: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erasure_ipc::{InferenceOutput, SubmissionResponse, WizardCommand};
    use image::Rgba;

    fn png_base64(width: u32, height: u32) -> String {
        let img = RgbaImage::from_pixel(width, height, Rgba([90, 120, 150, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        STANDARD.encode(out.into_inner())
    }

    fn message(json: &str) -> UiToCore {
        UiToCore::from_json(json).unwrap()
    }

    fn loaded_session() -> Session {
        let mut session = Session::default();
        let outcome = handle_message(
            &mut session,
            UiToCore::Image(ImageCommand::Load {
                data: format!("data:image/png;base64,{}", png_base64(40, 30)),
            }),
        );
        assert!(matches!(outcome.replies[0], CoreToUi::StateChanged(_)));
        assert!(matches!(outcome.replies[1], CoreToUi::Frame { .. }));
        session
    }

    fn paint(session: &mut Session) {
        for json in [
            r#"{"type":"Mask","data":{"Pointer":{"kind":"down","x":10.0,"y":10.0}}}"#,
            r#"{"type":"Mask","data":{"Pointer":{"kind":"move","x":20.0,"y":10.0}}}"#,
            r#"{"type":"Mask","data":{"Pointer":{"kind":"up"}}}"#,
        ] {
            handle_message(session, message(json));
        }
    }

    #[test]
    fn test_pointer_move_is_silent() {
        let mut session = loaded_session();
        let outcome = handle_message(
            &mut session,
            message(r#"{"type":"Mask","data":{"Pointer":{"kind":"move","x":5.0,"y":5.0}}}"#),
        );
        assert!(outcome.replies.is_empty());
        assert!(outcome.submit.is_none());
    }

    #[test]
    fn test_bad_upload_reports_error() {
        let mut session = Session::default();
        let outcome = handle_message(
            &mut session,
            UiToCore::Image(ImageCommand::Load {
                data: "!!!".to_string(),
            }),
        );
        assert!(matches!(
            &outcome.replies[..],
            [CoreToUi::Error { code, .. }] if code == "decode_failed"
        ));

        let outcome = handle_message(
            &mut session,
            UiToCore::Image(ImageCommand::Load {
                data: STANDARD.encode(b"GIF89a\x01\x00\x01\x00"),
            }),
        );
        assert!(matches!(
            &outcome.replies[..],
            [CoreToUi::Error { code, .. }] if code == "unsupported_format"
        ));
    }

    #[test]
    fn test_submit_without_mask_reports_missing_input() {
        let mut session = loaded_session();
        session.handle_wizard(WizardCommand::GoTo { step: 2 });

        let outcome = handle_message(&mut session, UiToCore::Submit);
        assert!(outcome.submit.is_none());
        assert!(matches!(
            &outcome.replies[0],
            CoreToUi::Error { code, .. } if code == "missing_input"
        ));
        assert_eq!(session.step().index(), 2);
    }

    #[test]
    fn test_submit_round_trip() {
        let mut session = loaded_session();
        paint(&mut session);

        let outcome = handle_message(&mut session, UiToCore::Submit);
        let (ticket, request) = outcome.submit.expect("request");
        assert_eq!(request.input.step, 60);
        match &outcome.replies[..] {
            [CoreToUi::StateChanged(snapshot)] => {
                assert!(snapshot.busy);
                assert_eq!(snapshot.step, 3);
            }
            other => panic!("unexpected replies: {other:?}"),
        }

        let response = SubmissionResponse {
            id: None,
            status: None,
            output: InferenceOutput {
                result_image: png_base64(40, 30),
            },
        };
        let outcome = handle_completion(&mut session, ticket, Ok(response));
        assert!(matches!(outcome.replies[0], CoreToUi::ResultReady { .. }));
        assert!(matches!(
            outcome.replies[1],
            CoreToUi::StateChanged(ref s) if s.step == 4 && !s.busy
        ));
    }

    #[test]
    fn test_result_for_replaced_image_is_not_announced() {
        let mut session = loaded_session();
        paint(&mut session);
        let (ticket, _) = handle_message(&mut session, UiToCore::Submit)
            .submit
            .expect("request");

        handle_message(
            &mut session,
            UiToCore::Image(ImageCommand::Load {
                data: png_base64(64, 48),
            }),
        );

        let response = SubmissionResponse {
            id: None,
            status: None,
            output: InferenceOutput {
                result_image: png_base64(40, 30),
            },
        };
        let outcome = handle_completion(&mut session, ticket, Ok(response));
        assert!(outcome.replies.is_empty());
        assert!(outcome.submit.is_none());
        assert_eq!(session.image().unwrap().display_size(), (64, 48));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_failed_completion_reports_error() {
        let mut session = loaded_session();
        paint(&mut session);
        let (ticket, _) = handle_message(&mut session, UiToCore::Submit)
            .submit
            .expect("request");

        let outcome = handle_completion(
            &mut session,
            ticket,
            Err(SubmitError::RequestFailed {
                status: Some(502),
                message: "Bad Gateway".to_string(),
            }),
        );
        assert!(matches!(
            &outcome.replies[0],
            CoreToUi::Error { code, message }
                if code == "request_failed" && message.contains("502")
        ));
    }

    #[test]
    fn test_data_url_prefix() {
        let url = png_data_url(&RgbaImage::new(2, 2)).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(decode_upload(&url).is_ok());
    }
}
