#![no_std]
#![no_main]

use cortex_m::peripheral::SCB;
use defmt::{error, info, warn, Debug2Format};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART1;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{Async, Config as UartConfig, Uart, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Instant, Ticker};
use static_cell::StaticCell;
use thrust_core::{
    next_command, Command, Hx711, LoadCell, PulseEmitter, RigConfig, TelemetryRecord,
    DEFAULT_CONFIG,
};
use thrust_stand_rp2040::{pulse_timing, RpPwmTimer, UartCommandSource};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
});

type Esc = PulseEmitter<RpPwmTimer<'static>>;
type Scale = LoadCell<Hx711<Input<'static>, Output<'static>, Delay>>;

/// Latest operator throttle command, consumed once per control cycle.
static COMMAND_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, Command>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Thrust stand starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());
    let config = DEFAULT_CONFIG;

    let signal = COMMAND_SIGNAL.init(Signal::new());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.baudrate;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (tx, rx) = uart.split();
    let commands = UartCommandSource::new(rx);

    // --- ESC Setup ---
    let timing = pulse_timing();
    info!(
        "DSHOT period {} ticks, one {} ticks, zero {} ticks",
        timing.period, timing.one, timing.zero
    );
    let pwm = Pwm::new_output_a(p.PWM_SLICE7, p.PIN_14, RpPwmTimer::idle_config());
    let esc = PulseEmitter::new(RpPwmTimer::new(pwm), timing);

    // --- Load Cell Setup ---
    let dout = Input::new(p.PIN_2, Pull::None);
    let sck = Output::new(p.PIN_3, Level::Low);
    let hx711 = Hx711::new(dout, sck, Delay, config.load_cell_gain);
    let scale = LoadCell::new(hx711, config.calibration_factor);

    spawner.spawn(command_task(commands, signal, config).unwrap());
    spawner.spawn(control_task(esc, scale, tx, signal, config).unwrap());

    info!("Thrust stand initialized, waiting for commands...");
}

/// Command task - reads UART lines and signals the latest throttle.
#[embassy_executor::task]
async fn command_task(
    mut commands: UartCommandSource<'static>,
    signal: &'static Signal<CriticalSectionRawMutex, Command>,
    config: RigConfig,
) {
    loop {
        match next_command(&mut commands, &config.mapper).await {
            Command::Reboot => {
                info!("Reboot requested");
                SCB::sys_reset();
            }
            command => signal.signal(command),
        }
    }
}

/// Control task - one frame and one telemetry line per loop period.
#[embassy_executor::task]
async fn control_task(
    mut esc: Esc,
    mut scale: Scale,
    mut tx: UartTx<'static, Async>,
    signal: &'static Signal<CriticalSectionRawMutex, Command>,
    config: RigConfig,
) {
    let scheduler = config.scheduler();
    let mut state = scheduler.initial_state();
    let mut ticker = Ticker::every(Duration::from_millis(config.loop_period_ms as u64));

    // Keep the ESC armed with idle frames while the load cell settles
    for _ in 0..config.settle_cycles() {
        critical_section::with(|_| scheduler.run_cycle(&mut state, &mut esc));
        if let Err(e) = scale.update() {
            warn!("Load cell error: {}", Debug2Format(&e));
        }
        ticker.next().await;
    }
    match scale.tare() {
        Ok(offset) => info!("Load cell tared at {}", offset),
        Err(e) => warn!("Load cell tare failed: {}", Debug2Format(&e)),
    }

    loop {
        if let Some(command) = signal.try_take() {
            scheduler.apply(&mut state, command);
        }

        match scale.update() {
            Ok(true) => state.record_thrust(scale.data()),
            Ok(false) => {}
            Err(e) => warn!("Load cell error: {}", Debug2Format(&e)),
        }

        // No interrupt may land between a wrap and the next compare write
        critical_section::with(|_| scheduler.run_cycle(&mut state, &mut esc));

        let record = TelemetryRecord::from_state(Instant::now().as_millis() as u32, &state);
        match record.write_line() {
            Ok(line) => {
                if let Err(e) = tx.write(line.as_bytes()).await {
                    error!("Telemetry write error: {:?}", e);
                }
            }
            Err(e) => error!("Telemetry format error: {:?}", e),
        }

        ticker.next().await;
    }
}
