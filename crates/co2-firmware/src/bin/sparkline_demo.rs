#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use co2_firmware::hardware::{create_i2c_bus, share_i2c_bus};
use co2_firmware::oled::OledPanel;
use co2_sparkline::demo::{ChartDemo, RandomGenerator};
use embassy_executor::Spawner;
use embassy_time::Delay;
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use log::info;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    let i2c = create_i2c_bus(peripherals.I2C0, peripherals.GPIO12, peripherals.GPIO11)
        .expect("Failed to configure I2C");
    let (_sensor_bus, display_bus) = share_i2c_bus(i2c);

    let panel = OledPanel::new(display_bus)
        .await
        .expect("Failed to initialize display");

    let generator = RandomGenerator::new(0.0, 10.0, Rng::new().random());
    let mut demo = ChartDemo::new(panel, generator, Delay).expect("Demo chart settings are valid");

    demo.run().await
}
