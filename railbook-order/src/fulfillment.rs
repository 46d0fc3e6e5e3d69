use railbook_core::{Booking, BookingId, Clock, Ticket, TicketStatus};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Issues tickets numbered `TKT{unix millis}`.
///
/// Numbers are unique per issuer: two tickets within the same millisecond
/// get consecutive values.
pub struct TicketIssuer {
    clock: Arc<dyn Clock>,
    last_millis: AtomicI64,
}

impl TicketIssuer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last_millis: AtomicI64::new(0),
        }
    }

    pub fn issue(&self, booking_id: &BookingId) -> Ticket {
        let now = self.clock.now();
        let candidate = now.timestamp_millis();
        let previous = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(candidate.max(last + 1)))
            .unwrap_or(candidate);
        let millis = candidate.max(previous + 1);

        Ticket {
            ticket_number: format!("TKT{}", millis),
            booking_id: booking_id.clone(),
            status: TicketStatus::Confirmed,
            issued_at: now,
        }
    }
}

/// Downloadable form of a confirmed ticket
#[derive(Debug, Clone, Serialize)]
pub struct TicketExport {
    pub ticket: Ticket,
    pub seats: Vec<String>,
    pub seat_count: usize,
    pub total_amount: u32,
    pub qr_payload: String,
}

pub fn export_ticket(ticket: &Ticket, booking: &Booking) -> TicketExport {
    TicketExport {
        ticket: ticket.clone(),
        seats: booking.seats.iter().map(|s| s.number.clone()).collect(),
        seat_count: booking.seats.len(),
        total_amount: booking.total_amount,
        qr_payload: qr_payload(ticket, booking),
    }
}

/// Data encoded into the ticket's QR code
fn qr_payload(ticket: &Ticket, booking: &Booking) -> String {
    serde_json::json!({
        "ticket_number": ticket.ticket_number,
        "booking_id": ticket.booking_id,
        "seats": booking.seat_numbers(),
        "issued_at": ticket.issued_at,
    })
    .to_string()
}

/// Printable ticket summary
pub fn render_ticket(ticket: &Ticket, booking: &Booking) -> String {
    let seat_count = booking.seats.len();
    let headline = if seat_count == 1 {
        "Your ticket has been booked successfully".to_string()
    } else {
        format!("{} tickets have been booked successfully", seat_count)
    };

    let rows = [
        ("Ticket Number", ticket.ticket_number.clone()),
        ("Booking ID", format!("#{}", ticket.booking_id)),
        ("Seat(s)", booking.seat_numbers()),
        ("Total Amount", format!("৳{}", booking.total_amount)),
        ("Status", format!("{:?}", ticket.status)),
    ];

    let mut out = String::from("Booking Confirmed!\n");
    out.push_str(&headline);
    out.push_str("\n\n");
    for (label, value) in rows {
        out.push_str(&format!("{:<14} {}\n", label, value));
    }
    out
}
