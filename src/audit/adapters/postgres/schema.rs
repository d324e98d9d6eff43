//! Diesel schema for session audit persistence.

diesel::table! {
    /// Closed orchestration sessions.
    session_audits (session_id) {
        /// Session identifier.
        session_id -> Uuid,
        /// Triggering event identifier.
        event_id -> Uuid,
        /// Stable subject key used for lookups.
        #[max_length = 255]
        subject_key -> Varchar,
        /// Subject reference as JSONB.
        subject -> Jsonb,
        /// Outcome label (completed, aborted, failed).
        #[max_length = 50]
        outcome -> Varchar,
        /// Abort reason or failure detail.
        detail -> Nullable<Text>,
        /// Reasoning rounds used.
        rounds_used -> Int4,
        /// Recorded tool invocations.
        invocation_count -> Int4,
        /// Recorded failed tool invocations.
        failed_invocation_count -> Int4,
        /// Full transcript as JSONB.
        transcript -> Jsonb,
        /// Session start.
        started_at -> Timestamptz,
        /// Session close.
        finished_at -> Timestamptz,
    }
}
