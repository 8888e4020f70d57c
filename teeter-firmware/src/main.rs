//! Teeter - Ball-Balancing Platform Firmware
//!
//! Main firmware binary for the RP2040 controller. Five cooperative tasks
//! share one mailbox and run from a single loop at 100 Hz:
//!
//! ```text
//! imu -> panel -> user -> motor -> controller
//! ```
//!
//! Calibration saved by the IMU and panel tasks lands in a RAM cache and
//! is committed to flash between scheduler passes.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_rp::adc::{Adc, Channel as AdcChannel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Flex, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{self, Pwm, PwmOutput};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use teeter_core::config::{
    ControlConfig, ImuMounting, MotorConfig, PanelConfig, RecordCache, DEFAULT_GAINS,
};
use teeter_core::mailbox::Shares;
use teeter_core::scheduler::{PassHook, Scheduler, Task};
use teeter_core::tasks::{ControllerTask, ImuTask, MotorTask, PanelTask, UserTask};
use teeter_core::time::Instant;
use teeter_drivers::bno055::{self, Bno055};
use teeter_drivers::motor::HBridgeMotor;
use teeter_drivers::touch::{Electrodes, ResistivePanel};
use teeter_hal::Clock;
use teeter_hal_rp2040::adc::PanelAdc;
use teeter_hal_rp2040::flash::Rp2040FlashStorage;
use teeter_hal_rp2040::gpio::PanelPin;
use teeter_hal_rp2040::time::UptimeClock;
use teeter_hal_rp2040::uart::Console;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// PWM counter top for a 20 kHz carrier at 125 MHz
const PWM_TOP: u16 = 6_249;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Teeter firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Calibration records, read once at start-up
    let cache = RecordCache::new();
    let mut flash = Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0);
    let found = flash.preload(&cache).await;
    info!("{} calibration record(s) in flash", found);

    let shares = Shares::new(DEFAULT_GAINS);

    // Operator console on UART0 (GPIO0 TX, GPIO1 RX)
    let tx_buf = TX_BUF.init([0u8; 1024]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let console = Console::new(uart.into_buffered(Irqs, tx_buf, rx_buf));

    // BNO055 on I2C0 (GPIO4 SDA, GPIO5 SCL)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let imu = Bno055::new(i2c, Delay, bno055::ADDRESS);

    // Touch panel: xm and ym are also wired to ADC1 (GPIO27) and ADC0 (GPIO26)
    let panel_config = PanelConfig::default();
    let electrodes = Electrodes {
        xm: PanelPin::new(Flex::new(p.PIN_20)),
        xp: PanelPin::new(Flex::new(p.PIN_21)),
        ym: PanelPin::new(Flex::new(p.PIN_22)),
        yp: PanelPin::new(Flex::new(p.PIN_18)),
    };
    let adc = PanelAdc::new(Adc::new_blocking(p.ADC, Default::default()));
    let xm_channel = AdcChannel::new_pin(p.PIN_27, Pull::None);
    let ym_channel = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let scanner = ResistivePanel::new(
        electrodes,
        adc,
        xm_channel,
        ym_channel,
        panel_config.contact_threshold,
    );

    // Motors on PWM slices 1 (GPIO2/3) and 3 (GPIO6/7)
    let mut pwm_config = pwm::Config::default();
    pwm_config.top = PWM_TOP;
    let (m1a, m1b) = Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, pwm_config.clone()).split();
    let (m2a, m2b) = Pwm::new_output_ab(p.PWM_SLICE3, p.PIN_6, p.PIN_7, pwm_config).split();
    let (Some(motor1), Some(motor2)) = (bridge(m1a, m1b), bridge(m2a, m2b)) else {
        error!("Motor PWM setup failed");
        halt().await
    };

    info!("Drivers initialized");

    let mut imu_task = ImuTask::new(&shares, imu, &cache, ImuMounting::default());
    let mut panel_task = PanelTask::new(&shares, scanner, UptimeClock, &cache, panel_config);
    let mut controller_task = ControllerTask::new(&shares, &DEFAULT_GAINS, ControlConfig::default());
    let mut motor_task = MotorTask::new(&shares, motor1, motor2, MotorConfig::default());
    let mut user_task = UserTask::new(&shares, console);

    let mut clock = UptimeClock;
    let mut housekeeping = Housekeeping {
        cache: &cache,
        flash: &mut flash,
    };
    {
        let mut scheduler = Scheduler::new(
            [
                &mut imu_task as &mut dyn Task,
                &mut panel_task,
                &mut user_task,
                &mut motor_task,
                &mut controller_task,
            ],
            Instant::from_micros(clock.now_us()),
        );

        info!("Scheduler running");

        if let Err(e) = scheduler
            .run_until_abort(&mut clock, &shares.abort, &mut housekeeping)
            .await
        {
            error!("Stopping on fatal error in {}: {}", e.task, e.error);
        }
    }

    // Leave the platform unpowered
    shares.duty1.write(0.0);
    shares.duty2.write(0.0);
    let _ = motor_task.step(Instant::from_micros(clock.now_us()));
    info!("Motors stopped");

    halt().await
}

/// Commits dirty calibration records and yields between passes
struct Housekeeping<'a, 'd> {
    cache: &'a RecordCache,
    flash: &'a mut Rp2040FlashStorage<'d>,
}

impl PassHook for Housekeeping<'_, '_> {
    async fn after_pass(&mut self) {
        if self.cache.is_dirty() {
            if let Err(e) = self.flash.flush(self.cache).await {
                warn!("Calibration not saved: {}", e);
            }
        }
        yield_now().await;
    }
}

/// Build one H-bridge from the two outputs of a PWM slice
fn bridge(
    a: Option<PwmOutput<'static>>,
    b: Option<PwmOutput<'static>>,
) -> Option<HBridgeMotor<PwmOutput<'static>>> {
    HBridgeMotor::new(a?, b?).ok()
}

/// Park the main task
async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
        trace!("Halted");
    }
}
