#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod export;
pub mod question_service;
pub mod sessions;
pub mod statistics_service;
pub mod warnings;

pub use qrlearn_core::Clock;

pub use app_services::AppServices;
pub use error::{
    AppServicesError, ExportError, QuestionServiceError, SessionError, StatisticsServiceError,
};
pub use export::ExportDocument;
pub use question_service::QuestionService;
pub use sessions::{
    CompletionReport, NextStep, ScanResult, ScanSession, SessionEffect, SessionEvent,
    SessionLoopService, SessionPhase, SessionProgress,
};
pub use statistics_service::{CompletionRecord, Records, StatisticsService};
pub use warnings::{DataSet, LoadWarning};
