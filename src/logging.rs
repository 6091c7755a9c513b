/// Standardized logging macros for consistent field names and message patterns across the application
///
/// These macros ensure:
/// - Consistent field naming conventions
/// - Appropriate logging levels for different scenarios
/// - Structured logging with context

// ============================================================================
// API Operation Logging Macros
// ============================================================================

/// Log the start of an API operation with consistent fields
#[macro_export]
macro_rules! log_api_start {
    ($operation:expr, user_id = $user_id:expr) => {
        tracing::debug!(
            operation = $operation,
            user_id = %$user_id,
            "API operation started"
        );
    };
    ($operation:expr, item_id = $item_id:expr) => {
        tracing::debug!(
            operation = $operation,
            item_id = %$item_id,
            "API operation started"
        );
    };
    ($operation:expr, revision_id = $revision_id:expr) => {
        tracing::debug!(
            operation = $operation,
            revision_id = %$revision_id,
            "API operation started"
        );
    };
    ($operation:expr) => {
        tracing::debug!(
            operation = $operation,
            "API operation started"
        );
    };
}

/// Log successful completion of an API operation
#[macro_export]
macro_rules! log_api_success {
    ($operation:expr, user_id = $user_id:expr, count = $count:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            user_id = %$user_id,
            count = $count,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, item_id = $item_id:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            item_id = %$item_id,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, revision_id = $revision_id:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            revision_id = %$revision_id,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            "API operation completed: {}", $msg
        );
    };
}

/// Log API operation errors with consistent structure
#[macro_export]
macro_rules! log_api_error {
    ($operation:expr, item_id = $item_id:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            item_id = %$item_id,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
    ($operation:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
}

/// Log API warnings with context
#[macro_export]
macro_rules! log_api_warn {
    ($operation:expr, item_id = $item_id:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            item_id = %$item_id,
            "API operation warning: {}", $msg
        );
    };
    ($operation:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            "API operation warning: {}", $msg
        );
    };
}

// ============================================================================
// Service Layer Logging Macros
// ============================================================================

/// Log service operation start with context
#[macro_export]
macro_rules! log_service_start {
    ($service:expr, $operation:expr, item_count = $count:expr) => {
        tracing::debug!(
            service = $service,
            operation = $operation,
            item_count = $count,
            "Service operation started"
        );
    };
    ($service:expr, $operation:expr, item_id = $item_id:expr) => {
        tracing::debug!(
            service = $service,
            operation = $operation,
            item_id = %$item_id,
            "Service operation started"
        );
    };
    ($service:expr, $operation:expr) => {
        tracing::debug!(
            service = $service,
            operation = $operation,
            "Service operation started"
        );
    };
}

/// Log service operation success
#[macro_export]
macro_rules! log_service_success {
    ($service:expr, $operation:expr, item_id = $item_id:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            item_id = %$item_id,
            duration_ms = $duration,
            "Service operation completed successfully"
        );
    };
    ($service:expr, $operation:expr, $msg:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            "Service operation completed: {}", $msg
        );
    };
}

/// Log service operation errors
#[macro_export]
macro_rules! log_service_error {
    ($service:expr, $operation:expr, item_id = $item_id:expr, error = $error:expr) => {
        tracing::error!(
            service = $service,
            operation = $operation,
            item_id = %$item_id,
            error = %$error,
            "Service operation failed"
        );
    };
    ($service:expr, $operation:expr, error = $error:expr) => {
        tracing::error!(
            service = $service,
            operation = $operation,
            error = %$error,
            "Service operation failed"
        );
    };
}

/// Log service warnings
#[macro_export]
macro_rules! log_service_warn {
    ($service:expr, $operation:expr, $msg:expr) => {
        tracing::warn!(
            service = $service,
            operation = $operation,
            "Service warning: {}",
            $msg
        );
    };
}

// ============================================================================
// Database Operation Logging Macros
// ============================================================================

/// Log database operation performance and results
#[macro_export]
macro_rules! log_db_operation {
    (debug, $operation:expr, item_id = $item_id:expr) => {
        tracing::debug!(
            component = "database",
            operation = $operation,
            item_id = %$item_id,
            "Database operation completed"
        );
    };
    (debug, $operation:expr, count = $count:expr) => {
        tracing::debug!(
            component = "database",
            operation = $operation,
            result_count = $count,
            "Database operation completed"
        );
    };
    (info, $operation:expr, $msg:expr) => {
        tracing::info!(
            component = "database",
            operation = $operation,
            "Database operation: {}", $msg
        );
    };
}

// ============================================================================
// System Event Logging Macros
// ============================================================================

/// Log system startup and shutdown events
#[macro_export]
macro_rules! log_system_event {
    (startup, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "startup",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (shutdown, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "shutdown",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (config, $msg:expr) => {
        tracing::info!(event_type = "configuration", "System event: {}", $msg);
    };
}

// ============================================================================
// Validation Logging Macros
// ============================================================================

/// Log validation results consistently
#[macro_export]
macro_rules! log_validation {
    (success, $component:expr, $msg:expr) => {
        tracing::debug!(
            event_type = "validation",
            component = $component,
            result = "success",
            "Validation completed: {}", $msg
        );
    };
    (failure, $component:expr, error = $error:expr) => {
        tracing::warn!(
            event_type = "validation",
            component = $component,
            result = "failure",
            error = %$error,
            "Validation failed"
        );
    };
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    #[test]
    fn test_logging_macros_compile() {
        let item_id = Uuid::new_v4();
        let revision_id = Uuid::new_v4();
        let error = anyhow::anyhow!("test error");

        log_api_start!("test_operation", user_id = "user-1");
        log_api_start!("test_operation", item_id = item_id);
        log_api_start!("test_operation", revision_id = revision_id);
        log_api_start!("test_operation");

        log_api_success!("test_operation", user_id = "user-1", count = 5, "items listed");
        log_api_success!("test_operation", revision_id = revision_id, "revision completed");
        log_api_success!("test_operation", "done");

        log_api_warn!("test_operation", item_id = item_id, "operation warning");
        log_api_error!("test_operation", error = error, "operation failed");

        log_service_start!("tracker_service", "complete_revision", item_id = revision_id);
        log_service_success!("tracker_service", "complete_revision", item_id = revision_id, duration_ms = 3);
        log_service_warn!("tracker_service", "complete_revision", "duplicate request");

        log_db_operation!(debug, "select_revision_item", item_id = revision_id);
        log_db_operation!(debug, "list_revision_items", count = 3);
        log_db_operation!(info, "migration", "database initialized");

        log_system_event!(startup, component = "server", "server starting");
        log_system_event!(config, "configuration loaded successfully");

        log_validation!(success, "api_request", "request validated");
        log_validation!(failure, "api_request", error = "bad date");
    }
}
