use ctlib_diagnostics::prelude::*;
use ctlib_diagnostics::registry::ContextMessageCallback;

/// Host double that records every installation attempt and refuses the
/// `fail_at`-th call (0-based).
struct RecordingHost {
    calls: Vec<CallbackSlot>,
    fail_at: Option<usize>,
    fail_with: RetCode,
    inner: CallbackTable,
}

impl RecordingHost {
    fn failing_at(fail_at: usize, fail_with: RetCode) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(fail_at),
            fail_with,
            inner: CallbackTable::new(),
        }
    }

    fn attempt(&mut self, slot: CallbackSlot) -> Option<RetCode> {
        let idx = self.calls.len();
        self.calls.push(slot);
        (self.fail_at == Some(idx)).then_some(self.fail_with)
    }
}

impl CallbackHost for RecordingHost {
    fn set_message_callback(
        &mut self,
        ctx: &ContextHandle,
        callback: ContextMessageCallback,
    ) -> RetCode {
        match self.attempt(CallbackSlot::Message) {
            Some(code) => code,
            None => self.inner.set_message_callback(ctx, callback),
        }
    }

    fn set_callback(
        &mut self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        callback: ConnectionCallback,
    ) -> RetCode {
        match self.attempt(callback.slot()) {
            Some(code) => code,
            None => self.inner.set_callback(ctx, conn, callback),
        }
    }
}

#[test]
fn installs_all_three_slots_in_order() -> Result<(), DiagnosticsError> {
    let mut host = RecordingHost {
        calls: Vec::new(),
        fail_at: None,
        fail_with: RetCode::Fail,
        inner: CallbackTable::new(),
    };
    let ctx = ContextHandle::from_raw(0xc0);
    install_handler(&mut host, &ctx, MessageCollector::new())?;

    assert_eq!(
        host.calls,
        vec![
            CallbackSlot::Message,
            CallbackSlot::ClientMessage,
            CallbackSlot::ServerMessage
        ]
    );
    for slot in host.calls.clone() {
        assert!(host.inner.is_installed(&ctx, slot));
    }
    Ok(())
}

#[test]
fn second_failure_stops_before_server_slot() {
    let mut host = RecordingHost::failing_at(1, RetCode::Fail);
    let ctx = ContextHandle::from_raw(0xc0);

    let err = install_handler(&mut host, &ctx, MessageCollector::new()).unwrap_err();

    assert!(matches!(
        err,
        DiagnosticsError::Registration {
            slot: CallbackSlot::ClientMessage,
            code: RetCode::Fail
        }
    ));
    assert_eq!(err.slot(), Some(CallbackSlot::ClientMessage));
    assert_eq!(
        err.to_string(),
        "Failed to install CS_CLIENTMSG_CB callback (ret: CS_FAIL)"
    );
    assert_eq!(
        host.calls,
        vec![CallbackSlot::Message, CallbackSlot::ClientMessage]
    );
    assert!(host.inner.is_installed(&ctx, CallbackSlot::Message));
    assert!(!host.inner.is_installed(&ctx, CallbackSlot::ServerMessage));
}

#[test]
fn first_failure_touches_nothing_else() {
    let mut host = RecordingHost::failing_at(0, RetCode::Other(-99));
    let ctx = ContextHandle::from_raw(1);
    let err = install_diagnostics(&mut host, &ctx).unwrap_err();
    assert_eq!(err.slot(), Some(CallbackSlot::Message));
    assert!(err.to_string().ends_with("(ret: -99)"));
    assert_eq!(host.calls, vec![CallbackSlot::Message]);
}

#[test]
fn dispatch_reaches_installed_formatters() -> Result<(), DiagnosticsError> {
    let mut table = CallbackTable::new();
    let ctx = ContextHandle::from_raw(0xabc);
    let conn = ConnectionHandle::from_raw(&ctx, 1);
    let (sink, out) = DiagnosticSink::buffer();
    install_handler(&mut table, &ctx, Formatter::new(sink))?;

    let ret = table.dispatch_context_message(&ctx, &ContextMessage::new(MsgNumber(0), "a"));
    assert_eq!(ret, RetCode::Succeed);
    let ret = table.dispatch_client_message(
        &ctx,
        Some(&conn),
        &ClientMessage::new(1, MsgNumber(0), "b"),
    );
    assert_eq!(ret, RetCode::Succeed);
    let ret = table.dispatch_server_message(
        &ctx,
        Some(&conn),
        &ServerMessage::new(17, 10, 1, 42, "Procedure failed").with_procedure("sp_foo"),
    );
    assert_eq!(ret, RetCode::Succeed);

    let text = out.contents();
    assert!(text.contains("CS-Library error:"));
    assert!(text.contains("Client Library error:"));
    assert!(text.contains("\tProcedure name: sp_foo\n"));
    assert!(!text.contains("Server name:"));
    Ok(())
}

#[test]
fn most_recent_registration_wins() -> Result<(), DiagnosticsError> {
    let mut table = CallbackTable::new();
    let ctx = ContextHandle::from_raw(2);
    let (first_sink, first) = DiagnosticSink::buffer();
    let (second_sink, second) = DiagnosticSink::buffer();

    install_handler(&mut table, &ctx, Formatter::new(first_sink))?;
    install_handler(&mut table, &ctx, Formatter::new(second_sink))?;

    table.dispatch_server_message(&ctx, None, &ServerMessage::new(1, 0, 0, 0, "hello"));
    table.dispatch_client_message(&ctx, None, &ClientMessage::new(1, MsgNumber(0), "hi"));
    table.dispatch_context_message(&ctx, &ContextMessage::new(MsgNumber(0), "hey"));

    assert!(first.contents().is_empty());
    assert_eq!(second.lines().len(), 6);
    Ok(())
}

#[test]
fn other_contexts_are_unaffected() -> Result<(), DiagnosticsError> {
    let mut table = CallbackTable::new();
    let configured = ContextHandle::from_raw(3);
    let bare = ContextHandle::from_raw(4);
    install_handler(&mut table, &configured, MessageCollector::new())?;

    let ret = table.dispatch_server_message(&bare, None, &ServerMessage::new(1, 0, 0, 0, "x"));
    assert_eq!(ret, RetCode::NoMsg);
    Ok(())
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn table_dispatches_from_many_threads() -> Result<(), DiagnosticsError> {
    assert_send_sync::<CallbackTable>();

    let mut table = CallbackTable::new();
    let ctx = ContextHandle::from_raw(0x7a);
    let collector = MessageCollector::new();
    install_handler(&mut table, &ctx, collector.clone())?;

    let table = &table;
    std::thread::scope(|scope| {
        for t in 0..4 {
            let ctx = ctx.clone();
            scope.spawn(move || {
                let conn = ConnectionHandle::from_raw(&ctx, t);
                for i in 0..25 {
                    let ret = table.dispatch_server_message(
                        &ctx,
                        Some(&conn),
                        &ServerMessage::new(i, 10, 1, 1, format!("conn {t}")),
                    );
                    assert_eq!(ret, RetCode::Succeed);
                }
            });
        }
    });

    assert_eq!(collector.len(), 100);
    Ok(())
}
