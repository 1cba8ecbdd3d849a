#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::{USART1, USART2, USART3};
use embassy_stm32::usart::{self, Config as UartConfig, Uart, UartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use relay_bridge_stm32::{
    DiscreteConfig, DiscreteInputs, ForwardLink, GpioRelayBank, HostFrame, LinkError, OneShotTx,
    RelayController, SinkFrame,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USART1 => usart::InterruptHandler<USART1>;
    USART2 => usart::InterruptHandler<USART2>;
    USART3 => usart::InterruptHandler<USART3>;
});

/// Host-link bytes from the rx task to the bridge task. The depth
/// backs the controller's own ring during bridge-task scheduling gaps;
/// sends are non-blocking and drop on overflow, the same overrun
/// policy as the ring itself.
static RX_BYTES: StaticCell<Channel<CriticalSectionRawMutex, u8, 64>> = StaticCell::new();

/// Host-link hardware faults from the rx task to the bridge task.
static LINK_ERRORS: StaticCell<Signal<CriticalSectionRawMutex, LinkError>> = StaticCell::new();

/// Single-slot handoff of the claimed forward frame to the tx task.
/// The controller's in-flight guard ensures a new frame is never
/// signaled before the previous one was taken and completed.
static FORWARD_FRAMES: StaticCell<Signal<CriticalSectionRawMutex, [u8; 4]>> = StaticCell::new();

/// Forward-link transmit completions back to the bridge task.
static FORWARD_DONE: StaticCell<Signal<CriticalSectionRawMutex, ()>> = StaticCell::new();

/// ForwardLink implementation: hand the claimed frame to the tx task.
struct ForwardIssue {
    frames: &'static Signal<CriticalSectionRawMutex, [u8; 4]>,
}

impl ForwardLink for ForwardIssue {
    fn issue(&mut self, frame: &[u8; 4]) {
        self.frames.signal(*frame);
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("relay bridge starting...");

    let p = embassy_stm32::init(relay_bridge_stm32::board::peripheral_config());

    let rx_bytes = RX_BYTES.init(Channel::new());
    let link_errors = LINK_ERRORS.init(Signal::new());
    let forward_frames = FORWARD_FRAMES.init(Signal::new());
    let forward_done = FORWARD_DONE.init(Signal::new());

    // --- UART setup ---
    let mut host_config = UartConfig::default();
    host_config.baudrate = 115_200;
    let host_uart = Uart::new(
        p.USART1,
        p.PA10, // RX
        p.PA9,  // TX
        Irqs,
        p.DMA2_CH7,
        p.DMA2_CH2,
        host_config,
    )
    .unwrap();
    let (host_tx, host_rx) = host_uart.split();

    let mut forward_config = UartConfig::default();
    forward_config.baudrate = 115_200;
    let forward_uart = Uart::new(
        p.USART2,
        p.PA3, // RX
        p.PA2, // TX
        Irqs,
        p.DMA1_CH6,
        p.DMA1_CH5,
        forward_config,
    )
    .unwrap();
    let (forward_tx, _forward_rx) = forward_uart.split();

    let mut sink_config = UartConfig::default();
    sink_config.baudrate = 115_200;
    let sink_uart = Uart::new(
        p.USART3,
        p.PB11, // RX
        p.PB10, // TX
        Irqs,
        p.DMA1_CH3,
        p.DMA1_CH1,
        sink_config,
    )
    .unwrap();
    let (sink_tx, _sink_rx) = sink_uart.split();

    // --- Relay bank, in relay-bit order ---
    let outputs = [
        Output::new(p.PC0, Level::Low, Speed::Low),
        Output::new(p.PC1, Level::Low, Speed::Low),
        Output::new(p.PC2, Level::Low, Speed::Low),
        Output::new(p.PC3, Level::Low, Speed::Low),
        Output::new(p.PC4, Level::Low, Speed::Low),
        Output::new(p.PC5, Level::Low, Speed::Low),
        Output::new(p.PC6, Level::Low, Speed::Low),
        Output::new(p.PC7, Level::Low, Speed::Low),
        Output::new(p.PC8, Level::Low, Speed::Low),
        Output::new(p.PC9, Level::Low, Speed::Low),
        Output::new(p.PC10, Level::Low, Speed::Low),
        Output::new(p.PC11, Level::Low, Speed::Low),
        Output::new(p.PC12, Level::Low, Speed::Low),
        Output::new(p.PC13, Level::Low, Speed::Low),
        Output::new(p.PC14, Level::Low, Speed::Low),
        Output::new(p.PC15, Level::Low, Speed::Low),
        Output::new(p.PD0, Level::Low, Speed::Low),
        Output::new(p.PD1, Level::Low, Speed::Low),
        Output::new(p.PD2, Level::Low, Speed::Low),
        Output::new(p.PD3, Level::Low, Speed::Low),
        Output::new(p.PA4, Level::Low, Speed::Low),
        Output::new(p.PA5, Level::Low, Speed::Low),
        Output::new(p.PA6, Level::Low, Speed::Low),
        Output::new(p.PA7, Level::Low, Speed::Low),
    ];
    #[allow(unused_mut)]
    let mut bank = GpioRelayBank::new(outputs);

    #[cfg(feature = "startup-sweep")]
    bank.sweep(Duration::from_millis(300)).await;

    let controller = RelayController::new(bank);

    // --- Discrete inputs and status LED ---
    let lines = [
        Input::new(p.PB13, Pull::None),
        Input::new(p.PB14, Pull::None),
        Input::new(p.PB15, Pull::None),
    ];
    let led = Output::new(p.PB0, Level::Low, Speed::Low);

    spawner.spawn(host_rx_task(host_rx, rx_bytes, link_errors)).unwrap();
    spawner
        .spawn(bridge_task(
            controller,
            rx_bytes,
            link_errors,
            forward_frames,
            forward_done,
        ))
        .unwrap();
    spawner
        .spawn(forward_tx_task(forward_tx, forward_frames, forward_done))
        .unwrap();
    spawner.spawn(sampler_task(host_tx, sink_tx, lines, led)).unwrap();

    info!("relay bridge initialized, waiting for data...");
}

/// Host rx task - reads one byte at a time and forwards it to the
/// bridge task; hardware faults become reset notifications.
#[embassy_executor::task]
async fn host_rx_task(
    mut rx: UartRx<'static, Async>,
    bytes: &'static Channel<CriticalSectionRawMutex, u8, 64>,
    errors: &'static Signal<CriticalSectionRawMutex, LinkError>,
) {
    let mut byte = [0u8; 1];
    loop {
        match rx.read(&mut byte).await {
            Ok(()) => {
                // Non-blocking: overflow drops the byte, exactly like
                // the controller's own ring under overrun.
                let _ = bytes.try_send(byte[0]);
            }
            Err(e) => errors.signal(map_uart_error(e)),
        }
    }
}

/// Classify a hardware UART fault for the reset upcall.
fn map_uart_error(e: usart::Error) -> LinkError {
    match e {
        usart::Error::Framing => LinkError::Framing,
        usart::Error::Overrun => LinkError::Overrun,
        _ => LinkError::Noise,
    }
}

/// Bridge task - owns the controller; every upcall and the cooperative
/// poll run here, so the single-writer discipline holds structurally.
#[embassy_executor::task]
async fn bridge_task(
    mut controller: RelayController<GpioRelayBank>,
    rx_bytes: &'static Channel<CriticalSectionRawMutex, u8, 64>,
    link_errors: &'static Signal<CriticalSectionRawMutex, LinkError>,
    forward_frames: &'static Signal<CriticalSectionRawMutex, [u8; 4]>,
    forward_done: &'static Signal<CriticalSectionRawMutex, ()>,
) {
    let mut forward = ForwardIssue {
        frames: forward_frames,
    };

    loop {
        match select3(rx_bytes.receive(), forward_done.wait(), link_errors.wait()).await {
            Either3::First(byte) => {
                controller.on_rx_byte(byte);
                // Opportunistically drain whatever else has arrived.
                while let Ok(b) = rx_bytes.try_receive() {
                    controller.on_rx_byte(b);
                }
            }
            Either3::Second(()) => controller.on_forward_tx_complete(),
            Either3::Third(error) => {
                warn!("host link fault: {:?}, resetting bridge state", error);
                controller.on_link_error(error);
                rx_bytes.clear();
            }
        }

        controller.poll(&mut forward);
    }
}

/// Forward tx task - performs the USART2 writes the bridge task issued
/// and reports each completion, keeping exactly one frame in flight.
#[embassy_executor::task]
async fn forward_tx_task(
    mut tx: UartTx<'static, Async>,
    frames: &'static Signal<CriticalSectionRawMutex, [u8; 4]>,
    done: &'static Signal<CriticalSectionRawMutex, ()>,
) {
    loop {
        let frame = frames.wait().await;
        if let Err(e) = tx.write(&frame).await {
            warn!("forward link write failed: {:?}", e);
        }
        done.signal(());
    }
}

/// Sampler task - fixed-cadence discrete-input report on the host link
/// (5 ms) and telemetry heartbeat on the sink link (300 ms).
#[embassy_executor::task]
async fn sampler_task(
    mut host_tx: UartTx<'static, Async>,
    mut sink_tx: UartTx<'static, Async>,
    lines: [Input<'static>; 3],
    mut led: Output<'static>,
) {
    let inputs = DiscreteInputs::new(DiscreteConfig::default());
    let mut host_buf = OneShotTx::new();
    let mut sink_buf = OneShotTx::new();
    let mut report_tick = Ticker::every(Duration::from_millis(5));
    let mut heartbeat_tick = Ticker::every(Duration::from_millis(300));

    loop {
        match select(report_tick.next(), heartbeat_tick.next()).await {
            Either::First(()) => {
                led.toggle();
                let mut raw = 0u8;
                for (bit, line) in lines.iter().enumerate() {
                    if line.is_high() {
                        raw |= 1 << bit;
                    }
                }
                let value = inputs.report_value(raw);
                let frame = HostFrame::discrete_report(value).encode();
                // The cadence is far slower than a 3-byte transmit, so
                // the fire-and-forget contract holds.
                if let Err(e) = host_tx.write(host_buf.load(frame)).await {
                    warn!("host link write failed: {:?}", e);
                }
            }
            Either::Second(()) => {
                let frame = SinkFrame::HEARTBEAT.encode();
                if let Err(e) = sink_tx.write(sink_buf.load(frame)).await {
                    warn!("sink link write failed: {:?}", e);
                }
            }
        }
    }
}
