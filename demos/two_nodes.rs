//! Two nodes exchanging a message over an in-memory radio channel

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use loralink::transport::RadioSettings;
use loralink::{
    BridgeNotifier, CorrelationId, DeviceId, DisplayNotifier, InterruptHandle, MessageId,
    Messenger, NodeConfig, Notifiers, Radio, RadioError,
};

/// One-way air path between two radios.
#[derive(Default)]
struct Air {
    frames: VecDeque<Vec<u8>>,
    irq: Option<InterruptHandle>,
}

struct LoopbackRadio {
    tx: Rc<RefCell<Air>>,
    rx: Rc<RefCell<Air>>,
}

impl Radio for LoopbackRadio {
    fn configure(&mut self, settings: &RadioSettings) -> Result<(), RadioError> {
        println!(
            "  radio: {} MHz, SF{}, {} dBm",
            settings.frequency_mhz, settings.spreading_factor, settings.tx_power_dbm
        );
        Ok(())
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        println!("  >> {}", String::from_utf8_lossy(frame));
        let mut air = self.tx.borrow_mut();
        air.frames.push_back(frame.to_vec());
        if let Some(irq) = &air.irq {
            irq.signal();
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<u8>, RadioError> {
        self.rx.borrow_mut().frames.pop_front().ok_or(RadioError::Timeout)
    }

    fn start_receive(&mut self) -> Result<(), RadioError> {
        Ok(())
    }
}

struct Console(&'static str);

impl DisplayNotifier for Console {
    fn on_status_line(&mut self, text: &str) {
        println!("  [{}] {text}", self.0);
    }
}

impl BridgeNotifier for Console {
    fn on_peer_message(&mut self, sender: &DeviceId, text: &str) {
        println!("  [{}] message from {sender}: {text:?}", self.0);
    }

    fn on_ack_status(
        &mut self,
        correlation_id: &CorrelationId,
        message_id: MessageId,
        acked: bool,
        final_failure: bool,
    ) {
        println!(
            "  [{}] {correlation_id} (#{message_id}) acked={acked} failed={final_failure}",
            self.0
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("loralink two-node demo");
    println!("======================\n");

    let big_to_phone = Rc::new(RefCell::new(Air::default()));
    let phone_to_big = Rc::new(RefCell::new(Air::default()));

    let mut big = Messenger::start(
        NodeConfig::new(DeviceId::new("BigNode")?),
        LoopbackRadio {
            tx: Rc::clone(&big_to_phone),
            rx: Rc::clone(&phone_to_big),
        },
        Notifiers::new(Console("BigNode"), Console("BigNode")),
    )?;
    let mut phone = Messenger::start(
        NodeConfig::new(DeviceId::new("PhoneNode")?),
        LoopbackRadio {
            tx: Rc::clone(&phone_to_big),
            rx: Rc::clone(&big_to_phone),
        },
        Notifiers::new(Console("PhoneNode"), Console("PhoneNode")),
    )?;
    big_to_phone.borrow_mut().irq = Some(phone.interrupt_handle());
    phone_to_big.borrow_mut().irq = Some(big.interrupt_handle());

    let start = Instant::now();
    println!("\nBigNode sends a message:");
    big.send("im alive", CorrelationId::random(), start)?;

    let mut now = start;
    for _ in 0..5 {
        now += Duration::from_millis(100);
        phone.pump(now);
        big.pump(now);
    }

    let metrics = big.metrics();
    println!(
        "\nBigNode: {} sent, {} delivered, {} pending",
        metrics.data_sent,
        metrics.delivered,
        big.pending()
    );
    Ok(())
}
